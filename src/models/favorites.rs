#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FavoriteRow {
    pub place_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteToggle {
    Added,
    Removed,
}

impl FavoriteToggle {
    pub fn as_str(self) -> &'static str {
        match self {
            FavoriteToggle::Added => "added",
            FavoriteToggle::Removed => "removed",
        }
    }
}
