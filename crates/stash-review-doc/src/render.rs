//! Render a diff with comments into an editable text document.

use crate::context::ReviewContext;
use crate::grammar;
use crate::model::DiffModel;

const USAGE_NOTES: &[&str] = &[
    "Add a comment by writing a line starting with \"# \" below the line it is about.",
    "A line starting with \"#|\" continues the comment above it.",
    "Change the text after an existing comment's [id@version] tag to edit it,",
    "or delete its lines to remove it. Keep diff lines and tags as they are.",
    "Lines starting with \"~\" are ignored.",
    "Save and quit to apply the changes; quit with an error (:cq in vim) to abort.",
];

/// Render `model` as a review document.
///
/// Never fails. Comment text that itself contains marker sequences is written
/// verbatim and may not read back identically.
pub fn render_document(ctx: &ReviewContext, model: &DiffModel) -> String {
    let mut lines: Vec<String> = Vec::new();

    if ctx.render.usage_notes {
        lines.push(grammar::note_line(&format!("Review of {}", model.path)));
        lines.extend(USAGE_NOTES.iter().map(|note| grammar::note_line(note)));
    }

    lines.push(grammar::old_file_line(&model.path));
    lines.push(grammar::new_file_line(&model.path));

    for hunk in &model.hunks {
        lines.push(grammar::hunk_header_line(hunk));
        for line in &hunk.lines {
            lines.push(grammar::diff_line(line.kind(), line.content()));
            for annotation in &line.annotations {
                lines.extend(grammar::annotation_lines(annotation));
            }
        }
    }

    if let Some(modeline) = &ctx.render.modeline {
        lines.push(grammar::note_line(modeline));
    }

    let mut document = lines.join("\n");
    document.push('\n');
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RenderOptions;
    use crate::model::{Annotation, DiffLine, Hunk};
    use pretty_assertions::assert_eq;

    fn sample() -> DiffModel {
        DiffModel::new("src/main.rs").with_hunk(
            Hunk::new(1, 3, 1, 4)
                .with_section("fn main()")
                .with_line(DiffLine::context("fn main() {", 1, 1))
                .with_line(
                    DiffLine::removed("    old();", 2)
                        .with_annotation(Annotation::existing("10", "0", "why remove?")),
                )
                .with_line(DiffLine::added("    new();", 2))
                .with_line(
                    DiffLine::added("    newer();", 3)
                        .with_annotation(Annotation::existing("11", "2", "first\nsecond"))
                        .with_annotation(Annotation::new("me too")),
                )
                .with_line(DiffLine::context("}", 3, 4)),
        )
    }

    #[test]
    fn test_render_plain_document() {
        let document = render_document(&ReviewContext::default(), &sample());
        let expected = "\
--- a/src/main.rs
+++ b/src/main.rs
@@ -1,3 +1,4 @@ fn main()
 fn main() {
-    old();
#[10@0] why remove?
+    new();
+    newer();
#[11@2] first
#| second
# me too
 }
";
        assert_eq!(document, expected);
    }

    #[test]
    fn test_render_with_usage_notes() {
        let ctx = ReviewContext::new(RenderOptions::interactive());
        let document = render_document(&ctx, &sample());

        assert!(document.starts_with("~ Review of src/main.rs\n"));
        assert!(document.ends_with("~ vim: ft=diff\n"));
        assert!(document.contains("\n--- a/src/main.rs\n"));
    }

    #[test]
    fn test_render_empty_model_has_only_file_headers() {
        let document = render_document(&ReviewContext::default(), &DiffModel::new("a.txt"));
        assert_eq!(document, "--- a/a.txt\n+++ b/a.txt\n");
    }

    #[test]
    fn test_render_text_containing_markers_does_not_fail() {
        let model = DiffModel::new("x").with_hunk(
            Hunk::new(1, 1, 1, 1).with_line(
                DiffLine::context("x", 1, 1)
                    .with_annotation(Annotation::new("#[1@1] sneaky\n+ not a line")),
            ),
        );
        let document = render_document(&ReviewContext::default(), &model);
        assert!(document.contains("# #[1@1] sneaky\n#| + not a line\n"));
    }
}
