use ast_grep_core::Node;

const ERROR_SNIPPET_CHARS: usize = 24;

/// Line (1-based) and leading text of the first `ERROR` or missing node,
/// depth first. A missing node reports the token the parser had to invent.
pub(super) fn first_error<D: ast_grep_core::Doc>(node: &Node<D>) -> Option<(usize, String)> {
    if node.kind().as_ref() == "ERROR" {
        let text = node.text();
        let first_line = text.lines().next().unwrap_or_default();
        let snippet: String = first_line.chars().take(ERROR_SNIPPET_CHARS).collect();
        return Some((node.start_pos().line() + 1, snippet));
    }
    if node.is_missing() {
        return Some((node.start_pos().line() + 1, format!("missing {}", node.kind())));
    }
    node.children().find_map(|child| first_error(&child))
}

// ── Doc comment extraction ────────────────────────────────────────

/// Raw comments immediately preceding `node`, oldest first.
///
/// A blank line ends the group, as does a comment trailing another
/// declaration on the same line.
pub(super) fn doc_comments<D: ast_grep_core::Doc>(node: &Node<D>) -> Vec<String> {
    let mut comments = Vec::new();
    let mut next_line = node.start_pos().line();
    let mut current = node.prev();
    while let Some(sibling) = current {
        if sibling.kind().as_ref() != "comment" || sibling.end_pos().line() + 1 < next_line {
            break;
        }
        if let Some(before) = sibling.prev()
            && before.kind().as_ref() != "comment"
            && before.end_pos().line() == sibling.start_pos().line()
        {
            break;
        }
        comments.push(sibling.text().to_string());
        next_line = sibling.start_pos().line();
        current = sibling.prev();
    }
    comments.reverse();
    comments
}

/// Names declared by a `type_parameter_list`: `[K comparable, V any]` → `K, V`.
pub(super) fn type_parameter_names<D: ast_grep_core::Doc>(list: &Node<D>) -> Vec<String> {
    list.children()
        .filter(|c| c.kind().as_ref() == "type_parameter_declaration")
        .flat_map(|decl| {
            decl.children()
                .filter(|c| c.kind().as_ref() == "identifier")
                .map(|n| n.text().to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}
