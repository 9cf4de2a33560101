//! Formatting through a shared scratch pool.

use keel_arena::{LinearArena, ScratchPool};
use keel_fmt::{Arg, FormatError, Formatter};
use keel_test_utils::{test_arena, test_scratch_config};
use proptest::prelude::*;

#[test]
fn escape_and_two_placeholders() {
    let mut root = test_arena(8 * 1024);
    let mut pool = ScratchPool::new(&mut root, test_scratch_config(2)).unwrap();
    let out = Formatter::new()
        .format(&mut pool, "a {u32} \\{ {str}", &[Arg::U32(7), Arg::Str("x")])
        .unwrap();
    assert_eq!(out, "a 7 { x");
}

#[test]
fn many_calls_reuse_the_same_scratch_arenas() {
    let mut root = test_arena(8 * 1024);
    let mut pool = ScratchPool::new(&mut root, test_scratch_config(1)).unwrap();
    let f = Formatter::new();
    for i in 0..1_000u32 {
        let s = f.format(&mut pool, "{u32}:{u32}", &[i.into(), (i * 2).into()]).unwrap();
        assert_eq!(s, format!("{i}:{}", i * 2));
    }
    assert_eq!(pool.available(), 1);
}

#[test]
fn replacing_a_builtin_printer() {
    let mut root = test_arena(8 * 1024);
    let mut pool = ScratchPool::new(&mut root, test_scratch_config(1)).unwrap();
    let mut f = Formatter::new();
    let previous = f.register("{bool}", |a, out| match a {
        Arg::Bool(b) => {
            out.push_str(if *b { "yes" } else { "no" });
            true
        }
        _ => false,
    });
    assert!(previous.is_some());
    assert_eq!(
        f.format(&mut pool, "{bool}/{bool}", &[true.into(), false.into()]).unwrap(),
        "yes/no"
    );
}

#[test]
fn empty_formatter_knows_nothing() {
    let mut root = LinearArena::with_capacity(4096, false).unwrap();
    let mut pool = ScratchPool::new(&mut root, test_scratch_config(1)).unwrap();
    let f = Formatter::empty();
    assert!(!f.has_printer("{u32}"));
    assert!(matches!(
        f.format(&mut pool, "{u32}", &[Arg::U32(1)]),
        Err(FormatError::UnknownPlaceholder { .. })
    ));
}

proptest! {
    #[test]
    fn plain_text_is_unchanged(text in "[^{\\\\]{0,200}") {
        let mut root = test_arena(8 * 1024);
        let mut pool = ScratchPool::new(&mut root, test_scratch_config(1)).unwrap();
        let out = Formatter::new().format(&mut pool, &text, &[]).unwrap();
        prop_assert_eq!(out, text);
    }

    #[test]
    fn integers_match_std(a in any::<i64>(), b in any::<u32>()) {
        let mut root = test_arena(8 * 1024);
        let mut pool = ScratchPool::new(&mut root, test_scratch_config(1)).unwrap();
        let out = Formatter::new()
            .format(&mut pool, "{i64},{u32}", &[Arg::I64(a), Arg::U32(b)])
            .unwrap();
        prop_assert_eq!(out, format!("{a},{b}"));
    }
}
