use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "suppliers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    pub contact_name: Option<String>,

    pub contact_email: Option<String>,

    pub contact_phone: Option<String>,

    /// Extended Producer Responsibility registration number, if enrolled.
    pub epr_number: Option<String>,

    pub is_weee_compliant: bool,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
