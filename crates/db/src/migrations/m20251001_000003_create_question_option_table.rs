//! Create `question_option` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QuestionOption::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuestionOption::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(QuestionOption::QuestionId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(QuestionOption::Text).string_len(500).not_null())
                    .col(ColumnDef::new(QuestionOption::OrderKey).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_option_question")
                            .from(QuestionOption::Table, QuestionOption::QuestionId)
                            .to(Question::Table, Question::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Order keys are unique within the parent question
        manager
            .create_index(
                Index::create()
                    .name("idx_question_option_question_order_key")
                    .table(QuestionOption::Table)
                    .col(QuestionOption::QuestionId)
                    .col(QuestionOption::OrderKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QuestionOption::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum QuestionOption {
    Table,
    Id,
    QuestionId,
    Text,
    OrderKey,
}

#[derive(Iden)]
enum Question {
    Table,
    Id,
}
