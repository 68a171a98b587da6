//! Literal end-to-end scenarios (§8): tiny affix/dictionary pairs
//! exercising one feature each, checked against the public `Engine` API.

use spellwright::Engine;

fn engine(aff: &str, dic: &str) -> Engine {
    Engine::new(aff, dic).expect("scenario affix/dic should parse")
}

/// S1 — plain suffix attachment.
#[test]
fn s1_suffix_attachment() {
    let e = engine("SFX A Y 1\nSFX A 0 s .\n", "1\nhello/A\n");

    assert!(e.check("hello").correct);
    assert!(e.check("hellos").correct);
    assert!(!e.check("hellox").correct);
    assert_eq!(e.stems("hellos"), vec!["hello".to_string()]);
}

/// S2 — crossproduct prefix and suffix combine on the same stem.
#[test]
fn s2_cross_product_prefix_and_suffix() {
    let e = engine(
        "PFX B Y 1\nPFX B 0 re .\nSFX A Y 1\nSFX A 0 ing .\n",
        "1\nwalk/AB\n",
    );

    assert!(e.check("walk").correct);
    assert!(e.check("rewalking").correct);
    assert!(!e.check("rewalked").correct);
}

/// S3 — KEEPCASE forces an exact-case dictionary match.
#[test]
fn s3_keepcase_requires_exact_case() {
    let e = engine("KEEPCASE K\n", "1\niPhone/K\n");

    assert!(!e.check("iphone").correct);
    assert!(!e.check("IPHONE").correct);
    assert!(e.check("iPhone").correct);
}

/// S4 — flag-based compounding with a minimum-length floor.
#[test]
fn s4_flag_compounding_with_min_length() {
    let e = engine("COMPOUNDFLAG C\nCOMPOUNDMIN 3\n", "2\nfoo/C\nbar/C\n");

    assert!(e.check("foo").correct);
    assert!(e.check("foobar").correct);
    assert!(!e.check("fo").correct);
}

/// S5 — COMPOUNDRULE pattern `AB*C`: exactly one A, zero-or-more B, one C.
#[test]
fn s5_compoundrule_pattern() {
    let e = engine(
        "COMPOUNDRULE 1\nCOMPOUNDRULE AB*C\n",
        "3\nred/A\nblue/B\ngreen/C\n",
    );

    assert!(e.check("redgreen").correct);
    assert!(e.check("redbluebluegreen").correct);
    assert!(!e.check("redred").correct);
}

/// S6 — a REP rule whose replacement spans two dictionary words (the `_`
/// placeholder decodes to a literal space) surfaces early in suggestions.
#[test]
fn s6_rep_rule_suggests_two_word_replacement() {
    let e = engine("REP 1\nREP alot a_lot\n", "2\na\nlot\n");

    let suggestions = e.suggest("alot");
    let position = suggestions.iter().position(|s| s == "a lot");
    assert!(
        position.is_some(),
        "expected \"a lot\" among suggestions, got {suggestions:?}"
    );
    assert!(position.unwrap() <= 2, "expected \"a lot\" to rank early");
}
