mod export;
mod html;

pub use export::write_summary_export;
pub use html::{HtmlReport, Logo};
