//! Desired question catalog.
//!
//! The catalog is authored in code and edited between deploys. Questions and
//! options are identified by their order keys, never by their text, so wording
//! can change without orphaning votes.

use std::collections::HashSet;

use ballot_common::{AppError, AppResult};

/// Longest option text the schema accepts.
pub const MAX_OPTION_TEXT_LEN: usize = 500;

/// A desired option.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogOption {
    /// Stable identity within the parent question
    pub order_key: i32,
    pub text: &'static str,
}

/// A desired question with its options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Stable identity across reconciliation runs
    pub order_key: i32,
    pub text: &'static str,
    pub options: &'static [CatalogOption],
}

/// An ordered set of desired questions.
pub type Catalog = [CatalogEntry];

const fn option(order_key: i32, text: &'static str) -> CatalogOption {
    CatalogOption { order_key, text }
}

/// The catalog shipped with the server.
pub const DEFAULT_CATALOG: &Catalog = &[
    CatalogEntry {
        order_key: 1,
        text: "Where should we go for our anniversary celebration?",
        options: &[option(1, "Beach Town"), option(2, "Redwood Hike")],
    },
    CatalogEntry {
        order_key: 2,
        text: "What type of dining experience should they enjoy?",
        options: &[
            option(1, "Fine dining at a Michelin-star restaurant"),
            option(2, "Private chef cooking class"),
            option(3, "Romantic picnic under the stars"),
            option(4, "Food tour of local cuisine"),
        ],
    },
    CatalogEntry {
        order_key: 3,
        text: "What activity should be part of their celebration?",
        options: &[
            option(1, "Couples massage and spa day"),
            option(2, "Hot air balloon ride"),
            option(3, "Wine tasting tour"),
            option(4, "Dance lessons"),
        ],
    },
    CatalogEntry {
        order_key: 4,
        text: "What entertainment would make the day special?",
        options: &[
            option(1, "Live music concert or show"),
            option(2, "Private movie screening"),
            option(3, "Comedy club night"),
            option(4, "Sunset cruise"),
        ],
    },
    CatalogEntry {
        order_key: 5,
        text: "What keepsake should they create together?",
        options: &[
            option(1, "Professional photo shoot"),
            option(2, "Pottery or art class creation"),
            option(3, "Custom jewelry making"),
            option(4, "Plant a tree together"),
        ],
    },
    CatalogEntry {
        order_key: 6,
        text: "How should they end the perfect anniversary day?",
        options: &[
            option(1, "Stargazing with champagne"),
            option(2, "Bonfire on the beach"),
            option(3, "Rooftop dinner at sunset"),
            option(4, "Couples' dance under the stars"),
        ],
    },
];

/// Check that a catalog can be reconciled.
///
/// Order keys must be unique among questions and among the options of each
/// question. Text must not be blank, and option text must fit the schema.
pub fn validate(catalog: &Catalog) -> AppResult<()> {
    let mut question_keys = HashSet::new();

    for entry in catalog {
        if !question_keys.insert(entry.order_key) {
            return Err(AppError::Reconciliation(format!(
                "Duplicate question order key {}",
                entry.order_key
            )));
        }
        if entry.text.trim().is_empty() {
            return Err(AppError::Reconciliation(format!(
                "Question {} has empty text",
                entry.order_key
            )));
        }

        let mut option_keys = HashSet::new();
        for opt in entry.options {
            if !option_keys.insert(opt.order_key) {
                return Err(AppError::Reconciliation(format!(
                    "Duplicate option order key {} in question {}",
                    opt.order_key, entry.order_key
                )));
            }
            if opt.text.trim().is_empty() {
                return Err(AppError::Reconciliation(format!(
                    "Option {} of question {} has empty text",
                    opt.order_key, entry.order_key
                )));
            }
            if opt.text.chars().count() > MAX_OPTION_TEXT_LEN {
                return Err(AppError::Reconciliation(format!(
                    "Option {} of question {} is too long (max {MAX_OPTION_TEXT_LEN} chars)",
                    opt.order_key, entry.order_key
                )));
            }
        }
    }

    Ok(())
}
