//! Markdown export of rendered documents.

use revcycle_types::RenderedDocument;
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Renders a document as Markdown: a title heading followed by one bold label
/// per line.
pub fn to_markdown(document: &RenderedDocument) -> String {
	let mut out = format!("# {}\n\n", document.title);
	for field in &document.fields {
		// Writing to a String cannot fail
		let _ = writeln!(out, "**{}:** {}  ", field.label, field.value);
	}
	out
}

/// File name a document is exported under, e.g. `purchase_order.md`.
pub fn file_name(document: &RenderedDocument) -> String {
	format!("{}.md", document.key.file_stem())
}

/// Writes each document into `directory`, creating it if needed.
///
/// Returns the written paths in the order of `documents`.
pub async fn export_documents(
	directory: impl AsRef<Path>,
	documents: &[RenderedDocument],
) -> std::io::Result<Vec<PathBuf>> {
	let directory = directory.as_ref();
	tokio::fs::create_dir_all(directory).await?;

	let mut written = Vec::with_capacity(documents.len());
	for document in documents {
		let path = directory.join(file_name(document));
		tokio::fs::write(&path, to_markdown(document)).await?;
		tracing::debug!(path = %path.display(), "Exported document");
		written.push(path);
	}
	Ok(written)
}

#[cfg(test)]
mod tests {
	use super::*;
	use revcycle_types::{DocumentField, DocumentKey};
	use tempfile::TempDir;

	fn packing_slip() -> RenderedDocument {
		RenderedDocument::new(
			DocumentKey::PackingSlip,
			vec![
				DocumentField::new("Packing Slip #", "PS-20250108"),
				DocumentField::new("Status", "Packed"),
			],
		)
	}

	#[test]
	fn test_markdown_layout() {
		let markdown = to_markdown(&packing_slip());
		assert_eq!(
			markdown,
			"# Packing Slip\n\n**Packing Slip #:** PS-20250108  \n**Status:** Packed  \n"
		);
		assert_eq!(file_name(&packing_slip()), "packing_slip.md");
	}

	#[tokio::test]
	async fn test_export_writes_files() {
		let temp_dir = TempDir::new().unwrap();
		let target = temp_dir.path().join("exports");

		let paths = export_documents(&target, &[packing_slip()]).await.unwrap();

		assert_eq!(paths, vec![target.join("packing_slip.md")]);
		let content = std::fs::read_to_string(&paths[0]).unwrap();
		assert!(content.starts_with("# Packing Slip"));
	}
}
