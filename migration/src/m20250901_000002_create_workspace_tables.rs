use sea_orm_migration::{prelude::*, sea_query::TableForeignKey};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Users {
    Table,
    WorkspaceId,
}

#[derive(DeriveIden)]
enum Workspaces {
    Table,
    Id,
    Name,
    OwnerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Memberships {
    Table,
    WorkspaceId,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Invitations {
    Table,
    Id,
    WorkspaceId,
    InvitedBy,
    Email,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, m: &SchemaManager) -> Result<(), DbErr> {
        m.create_table(
            Table::create()
                .table(Workspaces::Table)
                .col(
                    ColumnDef::new(Workspaces::Id)
                        .uuid()
                        .not_null()
                        .primary_key(),
                )
                .col(ColumnDef::new(Workspaces::Name).string().not_null())
                .col(ColumnDef::new(Workspaces::OwnerId).uuid().not_null())
                .col(
                    ColumnDef::new(Workspaces::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null(),
                )
                .col(
                    ColumnDef::new(Workspaces::UpdatedAt)
                        .timestamp_with_time_zone()
                        .not_null(),
                )
                .to_owned(),
        )
        .await?;

        m.alter_table(
            Table::alter()
                .table(Users::Table)
                .add_foreign_key(
                    TableForeignKey::new()
                        .name("fk_users_workspace")
                        .from_tbl(Users::Table)
                        .from_col(Users::WorkspaceId)
                        .to_tbl(Workspaces::Table)
                        .to_col(Workspaces::Id)
                        .on_delete(ForeignKeyAction::SetNull)
                        .on_update(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

        m.create_index(
            Index::create()
                .name("idx_users_workspace_id")
                .table(Users::Table)
                .col(Users::WorkspaceId)
                .to_owned(),
        )
        .await?;

        m.create_table(
            Table::create()
                .table(Memberships::Table)
                .col(ColumnDef::new(Memberships::WorkspaceId).uuid().not_null())
                .col(ColumnDef::new(Memberships::UserId).uuid().not_null())
                .col(
                    ColumnDef::new(Memberships::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null(),
                )
                .primary_key(
                    Index::create()
                        .col(Memberships::WorkspaceId)
                        .col(Memberships::UserId),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_memberships_workspace")
                        .from(Memberships::Table, Memberships::WorkspaceId)
                        .to(Workspaces::Table, Workspaces::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

        m.create_table(
            Table::create()
                .table(Invitations::Table)
                .col(
                    ColumnDef::new(Invitations::Id)
                        .uuid()
                        .not_null()
                        .primary_key(),
                )
                .col(ColumnDef::new(Invitations::WorkspaceId).uuid().not_null())
                .col(ColumnDef::new(Invitations::InvitedBy).uuid().not_null())
                .col(ColumnDef::new(Invitations::Email).string().not_null())
                .col(
                    ColumnDef::new(Invitations::Status)
                        .string_len(16)
                        .not_null(),
                )
                .col(
                    ColumnDef::new(Invitations::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null(),
                )
                .col(
                    ColumnDef::new(Invitations::UpdatedAt)
                        .timestamp_with_time_zone()
                        .not_null(),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_invitations_workspace")
                        .from(Invitations::Table, Invitations::WorkspaceId)
                        .to(Workspaces::Table, Workspaces::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

        // One outstanding invitation per (workspace, email); resolved
        // invitations stay around as history.
        m.get_connection()
            .execute_unprepared(
                r#"
                CREATE UNIQUE INDEX uk_invitations_pending
                ON invitations (workspace_id, email)
                WHERE status = 'pending';
                "#,
            )
            .await?;

        m.create_index(
            Index::create()
                .name("idx_invitations_email")
                .table(Invitations::Table)
                .col(Invitations::Email)
                .to_owned(),
        )
        .await?;

        Ok(())
    }

    async fn down(&self, m: &SchemaManager) -> Result<(), DbErr> {
        m.drop_table(
            Table::drop()
                .table(Invitations::Table)
                .if_exists()
                .to_owned(),
        )
        .await?;
        m.drop_table(
            Table::drop()
                .table(Memberships::Table)
                .if_exists()
                .to_owned(),
        )
        .await?;
        m.alter_table(
            Table::alter()
                .table(Users::Table)
                .drop_foreign_key(Alias::new("fk_users_workspace"))
                .to_owned(),
        )
        .await?;
        m.drop_index(
            Index::drop()
                .name("idx_users_workspace_id")
                .table(Users::Table)
                .to_owned(),
        )
        .await?;
        m.drop_table(
            Table::drop()
                .table(Workspaces::Table)
                .if_exists()
                .to_owned(),
        )
        .await?;
        Ok(())
    }
}
