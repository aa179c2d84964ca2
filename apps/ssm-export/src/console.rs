use std::io::{self, Write};

use time::{PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description};

pub const HEADER: &str = "      Size (bytes)     Last modified";
pub const RULE_WIDTH: usize = 75;

const LAST_MODIFIED: &[BorrowedFormatItem<'_>] =
	format_description!("[year]-[month]-[day] [hour]:[minute]");

/// `YYYY-MM-DD HH:MM`.
pub fn format_last_modified(at: PrimitiveDateTime) -> Result<String, time::error::Format> {
	at.format(LAST_MODIFIED)
}

/// Counter right-aligned to 4 columns, size right-aligned to 12, then the timestamp.
pub fn format_row(count: usize, size: usize, last_modified: &str) -> String {
	format!("{count:>4}. {size:>12}  {last_modified}")
}

/// Fixed-width progress listing, one row per exported map.
pub struct ProgressTable<W> {
	out: W,
}
impl<W> ProgressTable<W>
where
	W: Write,
{
	pub fn new(out: W) -> Self {
		Self { out }
	}

	pub fn header(&mut self) -> io::Result<()> {
		writeln!(self.out, "{HEADER}")?;
		writeln!(self.out, "{}", "_".repeat(RULE_WIDTH))
	}

	pub fn row(&mut self, count: usize, size: usize, last_modified: &str) -> io::Result<()> {
		writeln!(self.out, "{}", format_row(count, size, last_modified))
	}

	pub fn into_inner(self) -> W {
		self.out
	}
}
