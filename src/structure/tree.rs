//! Stack-based chapter tree builder
//!
//! Turns the flat, level-annotated chapter list a mode emits into an arena
//! tree. A new chapter becomes a child of the deepest chapter on the stack
//! whose level is strictly smaller; deeper-or-equal entries are popped first.
//! Skipped levels (a level-3 heading directly after a level-1) do not error;
//! the chapter nests under the nearest shallower ancestor.

use super::types::{ChapterNode, ChapterTree, FlatChapter};

/// Build an arena chapter tree from a flat level-annotated list
pub fn build_tree(flat: Vec<FlatChapter>) -> ChapterTree {
    let mut tree = ChapterTree::default();
    // Stack of (arena index, level) for the current ancestor chain
    let mut stack: Vec<(usize, u32)> = Vec::new();

    for chapter in flat {
        while matches!(stack.last(), Some(&(_, level)) if level >= chapter.level) {
            stack.pop();
        }

        let parent = stack.last().map(|&(index, _)| index);
        let index = tree.nodes.len();
        tree.nodes.push(ChapterNode {
            title: chapter.title,
            level: chapter.level,
            content: chapter.content,
            start_position: chapter.start_position,
            parent,
            children: Vec::new(),
        });

        match parent {
            Some(p) => tree.nodes[p].children.push(index),
            None => tree.roots.push(index),
        }
        stack.push((index, chapter.level));
    }

    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(title: &str, level: u32) -> FlatChapter {
        FlatChapter {
            title: title.to_string(),
            level,
            content: String::new(),
            start_position: 0,
        }
    }

    #[test]
    fn nests_by_level() {
        let tree = build_tree(vec![
            flat("one", 1),
            flat("one.one", 2),
            flat("one.two", 2),
            flat("two", 1),
        ]);

        assert_eq!(tree.roots, vec![0, 3]);
        assert_eq!(tree.nodes[0].children, vec![1, 2]);
        assert_eq!(tree.nodes[1].parent, Some(0));
        assert_eq!(tree.nodes[3].children, Vec::<usize>::new());
    }

    #[test]
    fn skipped_levels_nest_under_nearest_shallower_ancestor() {
        // Level 3 directly after level 1: no level 2 in between
        let tree = build_tree(vec![flat("top", 1), flat("deep", 3), flat("mid", 2)]);

        assert_eq!(tree.nodes[1].parent, Some(0));
        assert_eq!(tree.nodes[2].parent, Some(0));
        assert_eq!(tree.nodes[0].children, vec![1, 2]);
    }

    #[test]
    fn dfs_order_equals_document_order() {
        let tree = build_tree(vec![
            flat("a", 1),
            flat("a.a", 2),
            flat("a.a.a", 3),
            flat("a.b", 2),
            flat("b", 1),
            flat("b.a", 3),
        ]);
        assert_eq!(tree.dfs(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn root_sequence_tolerates_deep_first_chapter() {
        // Document opens with a deep heading: it becomes a root
        let tree = build_tree(vec![flat("deep-start", 3), flat("top", 1)]);
        assert_eq!(tree.roots, vec![0, 1]);
        assert_eq!(tree.nodes[0].parent, None);
    }

    #[test]
    fn empty_input_builds_empty_tree() {
        let tree = build_tree(Vec::new());
        assert!(tree.is_empty());
        assert!(tree.roots.is_empty());
    }
}
