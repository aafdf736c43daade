use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "content")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub original_title: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// "movie" or "series"
    pub content_type: String,
    pub release_year: Option<i32>,
    pub imdb_rating: Option<f32>,
    /// IMDb identifier, e.g. "tt1160419". Unique when present; rows created
    /// from provider results without an id leave this null.
    #[sea_orm(unique)]
    pub imdb_id: Option<String>,
    pub poster_url: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub actors_cast: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::view_history::Entity")]
    ViewHistory,
    #[sea_orm(has_many = "super::watchlist::Entity")]
    Watchlist,
}

impl Related<super::view_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ViewHistory.def()
    }
}

impl Related<super::watchlist::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Watchlist.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
