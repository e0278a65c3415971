//! Compare the fetched review with the edited one and derive comment changes.

use crate::context::{ReviewContext, Warning};
use crate::model::{Annotation, DiffModel, LineAnchor, Mutation};
use std::collections::{HashMap, HashSet};

/// Compute the mutations turning the comments of `original` into those of
/// `edited`.
///
/// Edited comments are matched to fetched ones by identity only:
/// - no identity: `Create` on the comment's line;
/// - known identity with different text: `Update` with the fetched version;
/// - known identity with the same text, line break style aside: nothing;
/// - fetched comment matched by nothing: `Delete`, whether or not its line
///   is still in the edited document.
///
/// Creates and updates come first, in edited document order, followed by
/// deletes in fetched document order. The result depends only on the two
/// models; anything odd is recorded as a warning in `ctx`.
pub fn diff_models(ctx: &mut ReviewContext, original: &DiffModel, edited: &DiffModel) -> Vec<Mutation> {
    let fetched = index_fetched(original);
    let mut matched: HashSet<&str> = HashSet::new();
    let mut mutations = Vec::new();

    for (line, annotation) in edited.annotations() {
        let Some(identity) = &annotation.identity else {
            mutations.push(create(line.anchor(), annotation));
            continue;
        };

        let Some((anchor, fetched_annotation)) = fetched.get(identity.id.as_str()) else {
            ctx.warn(Warning::UnknownIdentity {
                identity: identity.clone(),
            });
            mutations.push(create(line.anchor(), annotation));
            continue;
        };

        if !matched.insert(identity.id.as_str()) {
            ctx.warn(Warning::DuplicateIdentity {
                identity: identity.clone(),
            });
            mutations.push(create(line.anchor(), annotation));
            continue;
        }

        if *anchor != line.anchor() {
            ctx.warn(Warning::MovedAnnotation {
                identity: identity.clone(),
            });
        }

        if !same_text(&fetched_annotation.text, &annotation.text) {
            if let Some(fetched_identity) = &fetched_annotation.identity {
                mutations.push(Mutation::Update {
                    identity: fetched_identity.clone(),
                    text: annotation.text.clone(),
                });
            }
        }
    }

    for (_, annotation) in original.annotations() {
        if let Some(identity) = &annotation.identity {
            if !matched.contains(identity.id.as_str()) {
                mutations.push(Mutation::Delete {
                    identity: identity.clone(),
                });
                // A fetched model should not repeat identities; never delete twice.
                matched.insert(identity.id.as_str());
            }
        }
    }

    log::debug!("{} mutation(s) between fetched and edited review", mutations.len());
    mutations
}

/// Fetched comments with an identity, keyed by id. The first occurrence wins.
fn index_fetched(original: &DiffModel) -> HashMap<&str, (LineAnchor, &Annotation)> {
    let mut fetched = HashMap::new();
    for (line, annotation) in original.annotations() {
        if let Some(identity) = &annotation.identity {
            fetched
                .entry(identity.id.as_str())
                .or_insert((line.anchor(), annotation));
        }
    }
    fetched
}

/// Comment texts compared with `\r\n` and `\n` line breaks taken as equal.
fn same_text(fetched: &str, edited: &str) -> bool {
    fetched == edited || fetched.replace("\r\n", "\n") == edited.replace("\r\n", "\n")
}

fn create(anchor: LineAnchor, annotation: &Annotation) -> Mutation {
    Mutation::Create {
        anchor,
        text: annotation.text.clone(),
    }
}
