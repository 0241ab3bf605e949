use std::collections::HashMap;

use async_graphql_parser::{
    types::{ExecutableDocument, Selection, SelectionSet},
    Positioned,
};

use crate::error::{Error, Result};

/// Fails when fields are nested deeper than `limit`, fragments included.
/// Root fields are at depth 1.
pub(crate) fn check_depth(
    document: &ExecutableDocument,
    selection_set: &Positioned<SelectionSet>,
    limit: u16,
) -> Result<()> {
    let depth = max_depth(document, selection_set, &mut Walk::default())?;
    if depth > usize::from(limit) {
        return Err(Error::DepthLimitExceeded {
            depth,
            limit: usize::from(limit),
        });
    }
    Ok(())
}

/// Fragments being expanded and the depth of those already measured.
#[derive(Default)]
struct Walk<'a> {
    expanding: Vec<&'a str>,
    fragment_depths: HashMap<&'a str, usize>,
}

fn max_depth<'a>(
    document: &'a ExecutableDocument,
    selection_set: &'a Positioned<SelectionSet>,
    walk: &mut Walk<'a>,
) -> Result<usize> {
    let mut max = 0;
    for selection in &selection_set.node.items {
        let depth = match &selection.node {
            Selection::Field(field) => {
                let selection_set = &field.node.selection_set;
                if selection_set.node.items.is_empty() {
                    1
                } else {
                    max_depth(document, selection_set, walk)? + 1
                }
            }
            Selection::InlineFragment(fragment) => max_depth(document, &fragment.node.selection_set, walk)?,
            Selection::FragmentSpread(spread) => {
                let name = spread.node.fragment_name.node.as_str();
                if walk.expanding.contains(&name) {
                    return Err(Error::FragmentCycle { name: name.to_owned() });
                }
                if let Some(&depth) = walk.fragment_depths.get(name) {
                    max = max.max(depth);
                    continue;
                }
                let fragment = document
                    .fragments
                    .get(name)
                    .ok_or_else(|| Error::UnknownFragment { name: name.to_owned() })?;

                walk.expanding.push(name);
                let depth = max_depth(document, &fragment.node.selection_set, walk)?;
                walk.expanding.pop();
                walk.fragment_depths.insert(name, depth);
                depth
            }
        };
        max = max.max(depth);
    }
    Ok(max)
}
