use sea_orm_migration::{prelude::*, sea_query::TableCreateStatement};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
    Name,
    Technologies,
    OrganizationNumber,
    Address,
}

#[derive(DeriveIden)]
enum Contacts {
    Table,
    Id,
    CompanyId,
    Name,
    Role,
    Department,
    Description,
    Email,
    Phone,
}

#[derive(DeriveIden)]
enum Notes {
    Table,
    Id,
    ContactId,
    Content,
}

#[derive(DeriveIden)]
enum Todos {
    Table,
    Id,
    Title,
    Description,
    DueDate,
    Completed,
    CompletedAt,
    LinkedKind,
    LinkedId,
}

#[derive(DeriveIden)]
enum Candidates {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Role,
    Skills,
    ResumeFilename,
    ResumeOriginalName,
}

#[derive(DeriveIden)]
enum CandidateComments {
    Table,
    Id,
    CandidateId,
    Content,
}

/// Columns every scoped CRM table carries: the (workspace_id, created_by)
/// scope pair and the usual timestamps.
fn add_scope_columns(stmt: &mut TableCreateStatement) {
    stmt.col(ColumnDef::new(Alias::new("workspace_id")).uuid().null())
        .col(ColumnDef::new(Alias::new("created_by")).uuid().not_null())
        .col(
            ColumnDef::new(Alias::new("created_at"))
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Alias::new("updated_at"))
                .timestamp_with_time_zone()
                .not_null(),
        );
}

async fn add_scope_indexes(m: &SchemaManager<'_>, table: &str) -> Result<(), DbErr> {
    m.create_index(
        Index::create()
            .name(format!("idx_{table}_workspace_id"))
            .table(Alias::new(table))
            .col(Alias::new("workspace_id"))
            .to_owned(),
    )
    .await?;
    m.create_index(
        Index::create()
            .name(format!("idx_{table}_created_by"))
            .table(Alias::new(table))
            .col(Alias::new("created_by"))
            .to_owned(),
    )
    .await?;
    Ok(())
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, m: &SchemaManager) -> Result<(), DbErr> {
        let mut companies = Table::create()
            .table(Companies::Table)
            .col(
                ColumnDef::new(Companies::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(Companies::Name).string().not_null())
            .col(
                ColumnDef::new(Companies::Technologies)
                    .string()
                    .not_null()
                    .default(""),
            )
            .col(
                ColumnDef::new(Companies::OrganizationNumber)
                    .string()
                    .not_null()
                    .default(""),
            )
            .col(
                ColumnDef::new(Companies::Address)
                    .string()
                    .not_null()
                    .default(""),
            )
            .to_owned();
        add_scope_columns(&mut companies);
        m.create_table(companies).await?;

        let mut contacts = Table::create()
            .table(Contacts::Table)
            .col(ColumnDef::new(Contacts::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Contacts::CompanyId).uuid().not_null())
            .col(ColumnDef::new(Contacts::Name).string().not_null())
            .col(
                ColumnDef::new(Contacts::Role)
                    .string()
                    .not_null()
                    .default(""),
            )
            .col(
                ColumnDef::new(Contacts::Department)
                    .string()
                    .not_null()
                    .default(""),
            )
            .col(
                ColumnDef::new(Contacts::Description)
                    .string()
                    .not_null()
                    .default(""),
            )
            .col(
                ColumnDef::new(Contacts::Email)
                    .string()
                    .not_null()
                    .default(""),
            )
            .col(
                ColumnDef::new(Contacts::Phone)
                    .string()
                    .not_null()
                    .default(""),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_contacts_company")
                    .from(Contacts::Table, Contacts::CompanyId)
                    .to(Companies::Table, Companies::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        add_scope_columns(&mut contacts);
        m.create_table(contacts).await?;

        m.create_index(
            Index::create()
                .name("idx_contacts_company_id")
                .table(Contacts::Table)
                .col(Contacts::CompanyId)
                .to_owned(),
        )
        .await?;

        let mut notes = Table::create()
            .table(Notes::Table)
            .col(ColumnDef::new(Notes::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Notes::ContactId).uuid().not_null())
            .col(ColumnDef::new(Notes::Content).text().not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_notes_contact")
                    .from(Notes::Table, Notes::ContactId)
                    .to(Contacts::Table, Contacts::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        add_scope_columns(&mut notes);
        m.create_table(notes).await?;

        m.create_index(
            Index::create()
                .name("idx_notes_contact_id")
                .table(Notes::Table)
                .col(Notes::ContactId)
                .to_owned(),
        )
        .await?;

        let mut todos = Table::create()
            .table(Todos::Table)
            .col(ColumnDef::new(Todos::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Todos::Title).string().not_null())
            .col(
                ColumnDef::new(Todos::Description)
                    .string()
                    .not_null()
                    .default(""),
            )
            .col(
                ColumnDef::new(Todos::DueDate)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .col(
                ColumnDef::new(Todos::Completed)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(
                ColumnDef::new(Todos::CompletedAt)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .col(ColumnDef::new(Todos::LinkedKind).string_len(16).not_null())
            .col(ColumnDef::new(Todos::LinkedId).uuid().not_null())
            .to_owned();
        add_scope_columns(&mut todos);
        m.create_table(todos).await?;

        m.create_index(
            Index::create()
                .name("idx_todos_linked")
                .table(Todos::Table)
                .col(Todos::LinkedKind)
                .col(Todos::LinkedId)
                .to_owned(),
        )
        .await?;

        let mut candidates = Table::create()
            .table(Candidates::Table)
            .col(
                ColumnDef::new(Candidates::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(Candidates::Name).string().not_null())
            .col(
                ColumnDef::new(Candidates::Email)
                    .string()
                    .not_null()
                    .default(""),
            )
            .col(
                ColumnDef::new(Candidates::Phone)
                    .string()
                    .not_null()
                    .default(""),
            )
            .col(
                ColumnDef::new(Candidates::Role)
                    .string()
                    .not_null()
                    .default(""),
            )
            .col(
                ColumnDef::new(Candidates::Skills)
                    .string()
                    .not_null()
                    .default(""),
            )
            .col(
                ColumnDef::new(Candidates::ResumeFilename)
                    .string()
                    .not_null()
                    .default(""),
            )
            .col(
                ColumnDef::new(Candidates::ResumeOriginalName)
                    .string()
                    .not_null()
                    .default(""),
            )
            .to_owned();
        add_scope_columns(&mut candidates);
        m.create_table(candidates).await?;

        let mut comments = Table::create()
            .table(CandidateComments::Table)
            .col(
                ColumnDef::new(CandidateComments::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(CandidateComments::CandidateId)
                    .uuid()
                    .not_null(),
            )
            .col(ColumnDef::new(CandidateComments::Content).text().not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_candidate_comments_candidate")
                    .from(CandidateComments::Table, CandidateComments::CandidateId)
                    .to(Candidates::Table, Candidates::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        add_scope_columns(&mut comments);
        m.create_table(comments).await?;

        m.create_index(
            Index::create()
                .name("idx_candidate_comments_candidate_id")
                .table(CandidateComments::Table)
                .col(CandidateComments::CandidateId)
                .to_owned(),
        )
        .await?;

        for table in [
            "companies",
            "contacts",
            "notes",
            "todos",
            "candidates",
            "candidate_comments",
        ] {
            add_scope_indexes(m, table).await?;
        }

        Ok(())
    }

    async fn down(&self, m: &SchemaManager) -> Result<(), DbErr> {
        m.drop_table(
            Table::drop()
                .table(CandidateComments::Table)
                .if_exists()
                .to_owned(),
        )
        .await?;
        m.drop_table(
            Table::drop()
                .table(Candidates::Table)
                .if_exists()
                .to_owned(),
        )
        .await?;
        m.drop_table(Table::drop().table(Todos::Table).if_exists().to_owned())
            .await?;
        m.drop_table(Table::drop().table(Notes::Table).if_exists().to_owned())
            .await?;
        m.drop_table(Table::drop().table(Contacts::Table).if_exists().to_owned())
            .await?;
        m.drop_table(
            Table::drop()
                .table(Companies::Table)
                .if_exists()
                .to_owned(),
        )
        .await?;
        Ok(())
    }
}
