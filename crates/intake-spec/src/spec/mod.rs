pub mod catalog;
pub mod question;

pub use catalog::OptionCatalog;
pub use question::{AskWhen, ChoiceOption, QuestionKind, QuestionSpec};
