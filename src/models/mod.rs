pub mod content;
pub mod progress;

pub use content::{
    Category, CefrLevel, Item, ItemCollection, ItemContent, ItemKind, LessonData, PhraseRecord,
    Subcategory, SupplementalContent, SupplementalSource, VocabularyRecord,
};
pub use progress::{
    CategoryLayout, CategoryProgress, ItemProgress, SubcategoryProgress, UserProgress,
};
