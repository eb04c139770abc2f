use super::tree::Element;

/// Collects every non-empty branch tagged `tag_name`, in document order.
///
/// The walk descends into every branch, matches included, so an item nested
/// in another item is collected as well as its parent.
pub fn find_items<'a>(root: &'a Element, tag_name: &str) -> Vec<&'a Element> {
    let mut items = Vec::new();
    collect(root, tag_name, &mut items);
    items
}

fn collect<'a>(element: &'a Element, tag_name: &str, items: &mut Vec<&'a Element>) {
    let Element::Branch(node, children) = element else {
        return;
    };

    if node.tag == tag_name && !children.is_empty() {
        items.push(element);
    }

    for child in children {
        collect(child, tag_name, items);
    }
}
