// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Line tokenization and record streaming for delimited input

mod line;
mod reader;

pub use line::split_line;
pub use reader::RecordReader;
