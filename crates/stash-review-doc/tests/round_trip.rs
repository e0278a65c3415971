use pretty_assertions::assert_eq;
use stash_review_doc::{
    diff_models, parse_document, render_document, Annotation, DiffLine, DiffModel, Hunk,
    Identity, Mutation, ParseError, RenderOptions, ReviewContext, Warning,
};

fn reviewed() -> DiffModel {
    DiffModel::new("src/server.rs")
        .with_hunk(
            Hunk::new(3, 3, 3, 4)
                .with_section("fn serve()")
                .with_line(DiffLine::context("fn serve() {", 3, 3))
                .with_line(
                    DiffLine::removed("    listen(80);", 4)
                        .with_annotation(Annotation::existing("1", "0", "ok")),
                )
                .with_line(DiffLine::added("    listen(port);", 4))
                .with_line(
                    DiffLine::added("    log();", 5)
                        .with_annotation(Annotation::existing("2", "5", "too chatty")),
                )
                .with_line(DiffLine::context("}", 5, 6)),
        )
        .with_hunk(
            Hunk::new(20, 1, 21, 2)
                .with_line(DiffLine::context("// end", 20, 21))
                .with_line(DiffLine::added("", 22).with_annotation(Annotation::existing(
                    "3",
                    "1",
                    "trailing blank line\nplease drop it",
                ))),
        )
}

fn round_trip(model: &DiffModel, render: RenderOptions) -> DiffModel {
    let mut ctx = ReviewContext::new(render);
    let text = render_document(&ctx, model);
    let parsed = parse_document(&mut ctx, &text).unwrap();
    assert!(ctx.warnings().is_empty(), "{:?}", ctx.warnings());
    parsed
}

fn edit(model: &DiffModel, f: impl FnOnce(&str) -> String) -> (Vec<Mutation>, ReviewContext) {
    let mut ctx = ReviewContext::default();
    let text = render_document(&ctx, model);
    let edited = parse_document(&mut ctx, &f(&text)).unwrap();
    (diff_models(&mut ctx, model, &edited), ctx)
}

#[test]
fn render_then_parse_is_identity() {
    let model = reviewed();
    assert_eq!(round_trip(&model, RenderOptions::default()), model);
    assert_eq!(round_trip(&model, RenderOptions::interactive()), model);
}

#[test]
fn unedited_document_yields_no_mutations() {
    let (mutations, ctx) = edit(&reviewed(), |text| text.to_string());
    assert!(mutations.is_empty(), "{:?}", mutations);
    assert!(ctx.warnings().is_empty());
}

#[test]
fn new_comment_creates_on_its_line() {
    let (mutations, _) = edit(&reviewed(), |text| {
        text.replace(" fn serve() {\n", " fn serve() {\n# add docs\n")
    });

    assert_eq!(
        mutations,
        vec![Mutation::Create {
            anchor: DiffLine::context("fn serve() {", 3, 3).anchor(),
            text: "add docs".to_string(),
        }]
    );
}

#[test]
fn edited_comment_updates_with_fetched_version() {
    let (mutations, _) = edit(&reviewed(), |text| {
        text.replace("#[1@0] ok", "#[1@0] looks good")
    });

    assert_eq!(
        mutations,
        vec![Mutation::Update {
            identity: Identity::new("1", "0"),
            text: "looks good".to_string(),
        }]
    );
}

#[test]
fn removed_comment_is_deleted() {
    let (mutations, _) = edit(&reviewed(), |text| text.replace("#[2@5] too chatty\n", ""));

    assert_eq!(
        mutations,
        vec![Mutation::Delete {
            identity: Identity::new("2", "5"),
        }]
    );
}

#[test]
fn removing_a_continuation_updates_the_comment() {
    let (mutations, _) = edit(&reviewed(), |text| text.replace("#| please drop it\n", ""));

    assert_eq!(
        mutations,
        vec![Mutation::Update {
            identity: Identity::new("3", "1"),
            text: "trailing blank line".to_string(),
        }]
    );
}

#[test]
fn keep_one_remove_one_add_one() {
    let model = DiffModel::new("a.txt").with_hunk(
        Hunk::new(1, 3, 1, 3)
            .with_line(
                DiffLine::context("one", 1, 1)
                    .with_annotation(Annotation::existing("I1", "0", "keep")),
            )
            .with_line(
                DiffLine::context("two", 2, 2)
                    .with_annotation(Annotation::existing("I2", "0", "drop")),
            )
            .with_line(DiffLine::context("three", 3, 3)),
    );

    let (mutations, _) = edit(&model, |text| {
        text.replace("#[I2@0] drop\n", "")
            .replace(" three\n", " three\n# third\n")
    });

    assert_eq!(
        mutations,
        vec![
            Mutation::Create {
                anchor: DiffLine::context("three", 3, 3).anchor(),
                text: "third".to_string(),
            },
            Mutation::Delete {
                identity: Identity::new("I2", "0"),
            },
        ]
    );
}

#[test]
fn comment_before_any_diff_line_is_malformed() {
    let mut ctx = ReviewContext::default();
    let result = parse_document(&mut ctx, "# hello\n");
    assert!(matches!(result, Err(ParseError::MalformedDocument(_))));
}

#[test]
fn document_without_hunks_is_malformed() {
    let mut ctx = ReviewContext::default();
    let result = parse_document(&mut ctx, "~ note\n--- a/x\n+++ b/x\n");
    assert!(matches!(result, Err(ParseError::MalformedDocument(_))));
}

#[test]
fn empty_comment_survives_round_trip() {
    let model = DiffModel::new("x").with_hunk(
        Hunk::new(1, 1, 1, 1).with_line(
            DiffLine::context("x", 1, 1)
                .with_annotation(Annotation::existing("9", "0", ""))
                .with_annotation(Annotation::new("")),
        ),
    );
    assert_eq!(round_trip(&model, RenderOptions::default()), model);
}

#[test]
fn carriage_returns_survive_round_trip() {
    let model = DiffModel::new("win.txt").with_hunk(
        Hunk::new(1, 2, 1, 2)
            .with_line(DiffLine::context("x\r", 1, 1).with_annotation(Annotation::existing(
                "5",
                "0",
                "first\r\nsecond",
            )))
            .with_line(DiffLine::context("y\r", 2, 2)),
    );

    assert_eq!(round_trip(&model, RenderOptions::interactive()), model);
    let (mutations, _) = edit(&model, |text| text.to_string());
    assert!(mutations.is_empty(), "{:?}", mutations);
}

fn three_functions() -> DiffModel {
    DiffModel::new("lib.rs").with_hunk(
        Hunk::new(1, 3, 1, 4)
            .with_line(DiffLine::context("fn a() {}", 1, 1))
            .with_line(DiffLine::context("", 2, 2))
            .with_line(DiffLine::added("fn b() {}", 3))
            .with_line(DiffLine::context("fn c() {}", 3, 4)),
    )
}

#[test]
fn editor_trimming_blank_context_line_keeps_anchors() {
    let (mutations, ctx) = edit(&three_functions(), |text| {
        text.replace("\n \n", "\n\n")
            .replace("+fn b() {}\n", "+fn b() {}\n# comment on b\n")
    });

    assert_eq!(
        mutations,
        vec![Mutation::Create {
            anchor: DiffLine::added("fn b() {}", 3).anchor(),
            text: "comment on b".to_string(),
        }]
    );
    assert!(ctx.warnings().is_empty());
}

#[test]
fn deleted_diff_line_does_not_misplace_new_comments() {
    let (mutations, ctx) = edit(&three_functions(), |text| {
        text.replace(" fn a() {}\n", "")
            .replace(" fn c() {}\n", " fn c() {}\n# comment on c\n")
    });

    assert!(mutations.is_empty(), "{:?}", mutations);
    assert_eq!(
        ctx.warnings(),
        &[Warning::HunkLineCount {
            line: 3,
            expected: (3, 4),
            found: (2, 3),
            skipped: 1,
        }]
    );
}
