//! Integration tests for tactus-types.

use tactus_types::{BodyId, ElementId, NodeId, TactusError};

#[test]
fn ids_are_distinct_types() {
    let b = BodyId(3);
    let n = NodeId(3);
    let e = ElementId(3);
    assert_eq!(b.index(), 3);
    assert_eq!(n.index(), 3);
    assert_eq!(e.index(), 3);
}

#[test]
fn ids_from_raw() {
    let n: NodeId = 7u32.into();
    assert_eq!(n, NodeId(7));
}

#[test]
fn error_messages_carry_context() {
    let err = TactusError::UnknownBoundaryKind("slippery".into());
    assert!(err.to_string().contains("slippery"));

    let err = TactusError::DegenerateElement {
        element: 12,
        reason: "coplanar nodes".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("12"));
    assert!(msg.contains("coplanar"));
}

#[test]
fn body_ids_order_by_raw_value() {
    assert!(BodyId(1) < BodyId(2));
}
