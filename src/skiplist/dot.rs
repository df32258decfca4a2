//! Graphviz rendering of the level structure, for debugging.
//!
//! ```text
//! $ dot -Tsvg list.dot -o list.svg
//! ```

use std::fmt;
use std::fmt::Write;

use super::SkipList;
use super::node::HEAD;
use super::node::NULL;

impl<T: fmt::Debug> SkipList<T> {
    /// Render the list as a Graphviz digraph, one record per node with a
    /// port per level, links labelled with their spans.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        self.write_dot(&mut out).expect("writing to a String cannot fail");
        out
    }

    pub fn write_dot<W: Write>(&self, out: &mut W) -> fmt::Result {
        writeln!(out, "digraph skiplist {{")?;
        writeln!(out, "    rankdir=LR;")?;
        writeln!(out, "    node [shape=record];")?;

        write!(out, "    n{} [label=\"", HEAD)?;
        write_ports(out, self.height)?;
        writeln!(out, "head\"];")?;

        let mut idx = self.successor(HEAD);
        while idx != NULL {
            let node = self.arena.node(idx);
            write!(out, "    n{} [label=\"", idx)?;
            write_ports(out, node.height())?;
            writeln!(out, "{}\"];", escape(&format!("{:?}", self.arena.value(idx))))?;
            idx = self.successor(idx);
        }
        writeln!(out, "    nil [shape=point];")?;

        idx = HEAD;
        loop {
            for (level, link) in self.arena.node(idx).links.iter().enumerate() {
                let target = if link.next == NULL {
                    "nil".to_string()
                } else {
                    format!("n{}:l{}", link.next, level)
                };
                writeln!(out, "    n{}:l{} -> {} [label=\"{}\"];", idx, level, target, link.span)?;
            }
            idx = self.successor(idx);
            if idx == NULL {
                break;
            }
        }

        writeln!(out, "}}")
    }
}

/// Record fields for levels, top first.
fn write_ports<W: Write>(out: &mut W, height: usize) -> fmt::Result {
    for level in (0..height).rev() {
        write!(out, "<l{}> {}|", level, level)?;
    }
    Ok(())
}

/// Escape characters that are structural inside a record label.
fn escape(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        if matches!(c, '"' | '\\' | '{' | '}' | '|' | '<' | '>') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::super::Config;
    use super::*;

    #[test]
    fn empty_list_renders_head_only() {
        let list: SkipList<i32> = SkipList::new();
        let dot = list.to_dot();
        assert!(dot.starts_with("digraph skiplist {"));
        assert!(dot.contains("n0 [label=\"head\"]"));
        assert!(!dot.contains("->"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn every_link_is_drawn() {
        let mut list = SkipList::with_config(Config::new().seed(3)).unwrap();
        for v in 0..10 {
            list.insert(v);
        }
        let dot = list.to_dot();
        let total_links: usize = {
            let mut total = list.height();
            let mut idx = list.successor(HEAD);
            while idx != NULL {
                total += list.arena.node(idx).height();
                idx = list.successor(idx);
            }
            total
        };
        assert_eq!(dot.matches("->").count(), total_links);
        assert!(dot.contains("n0:l0 -> n1:l0 [label=\"1\"]"));
    }

    #[test]
    fn labels_are_escaped() {
        let mut list = SkipList::new();
        list.insert("a|b".to_string());
        let dot = list.to_dot();
        assert!(dot.contains("\\\"a\\|b\\\""));
    }
}
