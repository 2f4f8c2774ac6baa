mod page;

pub use page::{Page, publishable};
