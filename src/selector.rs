use crate::{
    environment::Environment,
    filter::FilterContext,
    node::{Location, Node, NodeList},
    query::Selector,
    value::JSONLike,
};

impl Selector {
    /// Apply this selector to `node`, returning selected children in order.
    pub(crate) fn resolve<'v, V: JSONLike>(
        &self,
        node: &Node<'v, V>,
        root: &'v V,
        env: &Environment<V>,
    ) -> NodeList<'v, V> {
        let value = node.value;
        let location = &node.location;

        match self {
            Selector::Name { name, .. } => value
                .member_entry(name)
                .map(|(k, v)| Node::new_object_member(v, location, k))
                .into_iter()
                .collect(),
            Selector::Index { index, .. } => norm_index(*index, value.len())
                .filter(|_| value.is_array())
                .and_then(|i| Some((i, value.element(i)?)))
                .map(|(i, v)| Node::new_array_element(v, location, i))
                .into_iter()
                .collect(),
            Selector::Slice {
                start, stop, step, ..
            } => {
                if value.is_array() {
                    slice(value, location, *start, *stop, *step)
                } else {
                    Vec::new()
                }
            }
            Selector::Wild { .. } => children(value, location).collect(),
            Selector::Filter { expression, .. } => children(value, location)
                .filter(|child| {
                    let context = FilterContext {
                        env,
                        root,
                        current: child.value,
                        key: child.location.last().copied(),
                    };
                    expression.evaluate(&context).is_truthy()
                })
                .collect(),
        }
    }
}

/// Array elements or object member values of `value`, in order.
pub(crate) fn children<'a, 'v: 'a, V: JSONLike>(
    value: &'v V,
    location: &'a Location<'v>,
) -> Box<dyn Iterator<Item = Node<'v, V>> + 'a> {
    if value.is_array() {
        Box::new(
            value
                .elements()
                .enumerate()
                .map(move |(i, v)| Node::new_array_element(v, location, i)),
        )
    } else {
        Box::new(
            value
                .members()
                .map(move |(k, v)| Node::new_object_member(v, location, k)),
        )
    }
}

/// Resolve a possibly negative index against an array of `length` elements.
fn norm_index(index: i64, length: usize) -> Option<usize> {
    if index < 0 {
        index
            .checked_abs()
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| length.checked_sub(i))
    } else {
        usize::try_from(index).ok()
    }
}

/// Slice bounds as `(lower, upper)`, following RFC 9535 section 2.3.4.2.2.
fn bounds(start: Option<i64>, stop: Option<i64>, step: i64, length: i128) -> (i128, i128) {
    let normalize = |i: i64| -> i128 {
        let i = i as i128;
        if i >= 0 {
            i
        } else {
            length + i
        }
    };

    if step >= 0 {
        let start = start.map(normalize).unwrap_or(0);
        let stop = stop.map(normalize).unwrap_or(length);
        (start.clamp(0, length), stop.clamp(0, length))
    } else {
        let start = start.map(normalize).unwrap_or(length - 1);
        let stop = stop.map(normalize).unwrap_or(-length - 1);
        (stop.clamp(-1, length - 1), start.clamp(-1, length - 1))
    }
}

/// Indices selected by a slice, in selection order.
pub(crate) fn slice_indices(
    start: Option<i64>,
    stop: Option<i64>,
    step: Option<i64>,
    length: usize,
) -> Vec<usize> {
    let step = step.unwrap_or(1);

    if step == 0 || length == 0 {
        return Vec::new();
    }

    let (lower, upper) = bounds(start, stop, step, length as i128);
    let mut indices = Vec::new();

    if step > 0 {
        let mut i = lower;
        while i < upper {
            indices.push(i as usize);
            i += step as i128;
        }
    } else {
        let mut i = upper;
        while lower < i {
            indices.push(i as usize);
            i += step as i128;
        }
    }

    indices
}

fn slice<'v, V: JSONLike>(
    array: &'v V,
    location: &Location<'v>,
    start: Option<i64>,
    stop: Option<i64>,
    step: Option<i64>,
) -> NodeList<'v, V> {
    slice_indices(start, stop, step, array.len())
        .into_iter()
        .filter_map(|i| {
            array
                .element(i)
                .map(|v| Node::new_array_element(v, location, i))
        })
        .collect()
}
