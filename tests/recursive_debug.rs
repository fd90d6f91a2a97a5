// Debug output of a map that contains itself renders the inner
// occurrence as `...` instead of recursing.
use slice_map::SliceMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

enum Value {
    Int(i32),
    Map(Rc<RefCell<SliceMap<&'static str, Value>>>),
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Map(m) => fmt::Debug::fmt(&*m.borrow(), f),
        }
    }
}

#[test]
fn self_reference_renders_ellipsis() {
    let map = Rc::new(RefCell::new(SliceMap::new()));
    map.borrow_mut().set("n", Value::Int(1));
    map.borrow_mut().set("me", Value::Map(map.clone()));

    assert_eq!(format!("{:?}", map.borrow()), r#"SliceMap(("n", 1), ("me", ...))"#);
    // Formatting again works: the guard was released.
    assert_eq!(format!("{:?}", map.borrow()), r#"SliceMap(("n", 1), ("me", ...))"#);

    // Break the cycle.
    map.borrow_mut().clear();
}

#[test]
fn nested_distinct_maps_render_fully() {
    let inner = Rc::new(RefCell::new(SliceMap::new()));
    inner.borrow_mut().set("x", Value::Int(7));
    let mut outer = SliceMap::new();
    outer.set("inner", Value::Map(inner));
    assert_eq!(format!("{:?}", outer), r#"SliceMap(("inner", SliceMap(("x", 7))))"#);
}
