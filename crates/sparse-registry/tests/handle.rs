//! Integration tests for entity handles

use sparse_registry::prelude::*;

#[derive(Clone, Debug, Default, PartialEq)]
struct Foo;

#[derive(Clone, Debug, Default, PartialEq)]
struct Bar;

#[test]
fn test_handle_basics() {
    let mut reg = Registry::<(Foo, Bar)>::new();
    let mut h = create_from(&mut reg);

    h.emplace::<Foo>();
    assert!(h.has::<Foo>());

    h.remove::<Foo>();
    assert!(!h.has::<Foo>());

    assert!(h.get_if::<Foo>().is_none());
}

#[test]
fn test_add() {
    let mut reg = Registry::<(Foo,)>::new();

    {
        // borrowed value, explicit type
        let mut h = create_from(&mut reg);
        let f = Foo;
        h.add_cloned::<Foo>(&f);
        assert!(h.has::<Foo>());
    }

    {
        // owned value, explicit type
        let mut h = create_from(&mut reg);
        h.add::<Foo>(Foo::default());
        assert!(h.has::<Foo>());
    }

    {
        // borrowed value, type inferred
        let mut h = create_from(&mut reg);
        let f = Foo;
        h.add_cloned(&f);
        assert!(h.has::<Foo>());
    }

    {
        // owned value, type inferred
        let mut h = create_from(&mut reg);
        h.add(Foo);
        assert!(h.has::<Foo>());
    }

    assert_eq!(reg.size(), 4);
    assert_eq!(reg.view::<(Foo,)>().count(), 4);
}

#[test]
fn test_erase_if() {
    let mut reg = Registry::<(Foo,)>::new();
    for _ in 0..4 {
        reg.create();
    }

    let mut passed_first = false;
    reg.erase_if(|_| {
        if !passed_first {
            passed_first = true;
            return false;
        }
        true
    });

    assert_eq!(reg.size(), 1);
}

#[test]
fn test_handle_sees_registry_changes() {
    let mut reg = Registry::<(Foo, Bar)>::new();
    let e = create_from(&mut reg).entity();
    reg.emplace::<Bar>(e);

    let h = reg.handle(e);
    assert!(h.valid());
    assert!(h.has::<Bar>());
    assert!(h.registry().has::<Bar>(e));
}

#[test]
fn test_handle_destroy() {
    let mut reg = Registry::<(Foo, Bar)>::new();
    let keep = reg.create();

    let mut h = create_from(&mut reg);
    h.emplace::<Foo>();
    let e = h.entity();
    let reg = h.destroy();

    assert!(!reg.valid(e));
    assert!(reg.valid(keep));
    assert_eq!(reg.storage::<Foo>().len(), 0);
}
