//! Custom edge-list parsing.
//!
//! Format: comma separated `source-target` or `source-target-weight` tokens,
//! e.g. `0-1-4, 1-2-2, 2-3`. A missing weight is [`DEFAULT_WEIGHT`]. One bad
//! token rejects the whole input; no partial graph is ever produced.

use thiserror::Error;

use crate::graph::{Edge, GraphModel, NodeId};

/// Weight used when a token has only two segments.
pub const DEFAULT_WEIGHT: u64 = 1;

/// Largest accepted weight. Any simple path in a parsed graph then sums to
/// well under `u64::MAX`.
pub const MAX_WEIGHT: u64 = u32::MAX as u64;

/// Why a custom edge list was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Nothing but whitespace was supplied
    #[error("enter edges such as 0-1-5, 1-2-3")]
    Empty,

    /// A token did not have two or three `-` separated segments
    #[error("invalid edge `{token}`: expected source-target or source-target-weight")]
    Segments { token: String },

    /// A segment was not a non-negative integer
    #[error("invalid edge `{token}`: {field} `{value}` is not a non-negative integer")]
    NotANumber {
        token: String,
        field: &'static str,
        value: String,
    },

    /// A weight above [`MAX_WEIGHT`]
    #[error("invalid edge `{token}`: weight {weight} exceeds {max}", max = MAX_WEIGHT)]
    WeightTooLarge { token: String, weight: u64 },
}

/// Parse an edge list into a graph laid out on a circle.
pub fn parse_edge_list(input: &str) -> Result<GraphModel, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseError::Empty);
    }

    let edges = input
        .split(',')
        .map(parse_token)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GraphModel::from_edges(edges))
}

fn parse_token(raw: &str) -> Result<Edge, ParseError> {
    let token = raw.trim();
    let parts: Vec<&str> = token.split('-').collect();
    if !(2..=3).contains(&parts.len()) {
        return Err(ParseError::Segments {
            token: token.to_string(),
        });
    }

    let number = |field: &'static str, value: &str| {
        value
            .trim()
            .parse::<u64>()
            .map_err(|_| ParseError::NotANumber {
                token: token.to_string(),
                field,
                value: value.trim().to_string(),
            })
    };

    let source = number("source", parts[0])?;
    let target = number("target", parts[1])?;
    let weight = match parts.get(2) {
        Some(w) => number("weight", w)?,
        None => DEFAULT_WEIGHT,
    };
    if weight > MAX_WEIGHT {
        return Err(ParseError::WeightTooLarge {
            token: token.to_string(),
            weight,
        });
    }

    Ok(Edge {
        source: NodeId(source),
        target: NodeId(target),
        weight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Neighbor;
    use proptest::prelude::*;

    #[test]
    fn weights_default_to_one() {
        let graph = parse_edge_list("0-1,1-2,0-2").unwrap();
        assert_eq!(graph.edges().len(), 3);
        assert!(graph.edges().iter().all(|e| e.weight == DEFAULT_WEIGHT));
    }

    #[test]
    fn explicit_weights_are_kept() {
        let graph = parse_edge_list("0-1-4, 1-2-2").unwrap();
        assert_eq!(
            graph.neighbors(NodeId(1)),
            &[
                Neighbor { node: NodeId(0), weight: 4 },
                Neighbor { node: NodeId(2), weight: 2 },
            ]
        );
    }

    #[test]
    fn whitespace_around_tokens_is_ignored() {
        let graph = parse_edge_list("  0 - 1 - 3 ,   2-1  ").unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.neighbors(NodeId(0))[0].weight, 3);
    }

    #[test]
    fn weights_above_the_limit_are_rejected() {
        let graph = parse_edge_list("0-1-4294967295").unwrap();
        assert_eq!(graph.edges()[0].weight, MAX_WEIGHT);

        assert_eq!(
            parse_edge_list("0-1-2, 1-2-4294967296"),
            Err(ParseError::WeightTooLarge {
                token: "1-2-4294967296".into(),
                weight: MAX_WEIGHT + 1,
            })
        );
        assert!(matches!(
            parse_edge_list(&format!("0-1-{}", u64::MAX)),
            Err(ParseError::WeightTooLarge { .. })
        ));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(parse_edge_list("   "), Err(ParseError::Empty));
    }

    #[test]
    fn wrong_segment_count_is_rejected() {
        assert_eq!(
            parse_edge_list("0-1,2"),
            Err(ParseError::Segments { token: "2".into() })
        );
        assert_eq!(
            parse_edge_list("0-1-2-3"),
            Err(ParseError::Segments { token: "0-1-2-3".into() })
        );
        assert!(matches!(parse_edge_list("0-1,"), Err(ParseError::Segments { .. })));
    }

    #[test]
    fn non_numeric_fields_are_rejected() {
        let err = parse_edge_list("0-1,a-2").unwrap_err();
        assert_eq!(
            err,
            ParseError::NotANumber {
                token: "a-2".into(),
                field: "source",
                value: "a".into(),
            }
        );
        assert!(err.to_string().contains("a-2"));

        let err = parse_edge_list("0-1-x").unwrap_err();
        assert!(matches!(err, ParseError::NotANumber { field: "weight", .. }));
    }

    #[test]
    fn nodes_are_the_union_of_endpoints() {
        let graph = parse_edge_list("5-3,3-9").unwrap();
        let ids: Vec<u64> = graph.node_ids().map(|n| n.0).collect();
        assert_eq!(ids, vec![3, 5, 9]);
        let laid_out: Vec<u64> = graph.nodes().iter().map(|n| n.id.0).collect();
        assert_eq!(laid_out, vec![3, 5, 9]);
    }

    proptest! {
        #[test]
        fn adjacency_mirrors_every_kept_edge(
            edges in prop::collection::vec((0u64..8, 0u64..8, 1u64..20), 1..20)
        ) {
            let text = edges
                .iter()
                .map(|(s, t, w)| format!("{s}-{t}-{w}"))
                .collect::<Vec<_>>()
                .join(",");
            let graph = parse_edge_list(&text).unwrap();

            for edge in graph.edges() {
                prop_assert!(graph.neighbors(edge.source).iter().any(|n| n.node == edge.target));
                prop_assert!(graph.neighbors(edge.target).iter().any(|n| n.node == edge.source));
            }
            for id in graph.node_ids() {
                let list = graph.neighbors(id);
                prop_assert!(list.windows(2).all(|w| w[0].node < w[1].node));
            }
        }
    }
}
