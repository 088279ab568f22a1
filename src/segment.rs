use log::trace;

use crate::{
    environment::Environment,
    node::{Node, NodeList},
    query::{Segment, Selector},
    selector::children,
    value::JSONLike,
};

impl Segment {
    /// Apply this segment to each node in `nodes`, producing the next node list.
    pub(crate) fn resolve<'v, V: JSONLike>(
        &self,
        nodes: NodeList<'v, V>,
        root: &'v V,
        env: &Environment<V>,
    ) -> NodeList<'v, V> {
        trace!("resolving {} against {} node(s)", self, nodes.len());

        match self {
            Segment::Child { selectors, .. } => nodes
                .iter()
                .flat_map(|node| {
                    selectors
                        .iter()
                        .flat_map(move |s| s.resolve(node, root, env))
                })
                .collect(),
            Segment::Recursive { selectors, .. } => {
                let mut rv = Vec::new();
                for node in nodes.iter() {
                    visit(node, selectors, root, env, &mut rv);
                }
                rv
            }
        }
    }
}

/// Apply `selectors` to `node`, then to each of its descendants in
/// depth-first pre-order.
fn visit<'v, V: JSONLike>(
    node: &Node<'v, V>,
    selectors: &[Selector],
    root: &'v V,
    env: &Environment<V>,
    rv: &mut NodeList<'v, V>,
) {
    for selector in selectors {
        rv.extend(selector.resolve(node, root, env));
    }

    for child in children(node.value, &node.location) {
        visit(&child, selectors, root, env, rv);
    }
}
