/// Builds a [`SegmentNode`](crate::SegmentNode) from a tag and its elements.
///
/// Each element is either a value (anything implementing `Display`) or a bracketed
/// list of components.
///
/// ```rust
/// use edi_text::{segment, Separators};
///
/// let count = 3;
/// let unt = segment!("UNT", count, "ME0001");
/// let unh = segment!("UNH", "ME0001", ["ORDERS", "D", "96A", "UN"]);
///
/// let seps = Separators::edifact();
/// assert_eq!(unt.render(&seps), "UNT+3+ME0001'");
/// assert_eq!(unh.render(&seps), "UNH+ME0001+ORDERS:D:96A:UN'");
/// ```
#[macro_export]
macro_rules! segment {
    // No elements left
    (@elements $node:ident) => {};

    // Composite element
    (@elements $node:ident [ $($component:expr),* $(,)? ] $(, $($rest:tt)*)?) => {
        $node.push_element($crate::Element::composite(vec![
            $(::std::string::ToString::to_string(&$component)),*
        ]));
        $( $crate::segment!(@elements $node $($rest)*); )?
    };

    // Simple element
    (@elements $node:ident $value:expr $(, $($rest:tt)*)?) => {
        $node.push_element($crate::Element::simple(
            ::std::string::ToString::to_string(&$value),
        ));
        $( $crate::segment!(@elements $node $($rest)*); )?
    };

    ($tag:expr $(, $($rest:tt)*)?) => {{
        #[allow(unused_mut)]
        let mut node = $crate::SegmentNode::new($tag);
        $( $crate::segment!(@elements node $($rest)*); )?
        node
    }};
}
