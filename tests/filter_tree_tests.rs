//! Integration tests for composed filter trees

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::thread;

use blocklist_engine_r::{
    compile, AndFilter, CacheMode, CachingFilter, DomainFilter, DomainIter, DomainListFilter,
    DomainMatchMode, FilterConfig, FilterDecision, FilterError, FilterRef, NegatingFilter,
    OrFilter, Result,
};

/// Leaf that blocks a fixed set of domains and counts lookups
struct StubFilter {
    this: Weak<StubFilter>,
    list_id: Option<i32>,
    blocked: HashSet<String>,
    calls: AtomicUsize,
}

impl StubFilter {
    fn new(list_id: Option<i32>, blocked: &[&str]) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            list_id,
            blocked: blocked.iter().map(|d| d.to_string()).collect(),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DomainFilter<String> for StubFilter {
    fn is_blocked(&self, domain: &String) -> FilterDecision<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let me = self.this.upgrade().map(|me| me as FilterRef<String>);
        FilterDecision::new(domain.clone(), self.blocked.contains(domain), me)
    }

    fn list_id(&self) -> Option<i32> {
        self.list_id
    }

    fn name(&self) -> String {
        "stub".to_string()
    }

    fn size(&self) -> usize {
        self.blocked.len()
    }

    fn domains(&self) -> Result<DomainIter<'_, String>> {
        Ok(Box::new(self.blocked.iter().cloned()))
    }

    fn child_filters(&self) -> Vec<FilterRef<String>> {
        Vec::new()
    }
}

const SAMPLE: [&str; 6] = [
    "ads.example.com",
    "safe.example.com",
    "example.com",
    "tracker.net",
    "cdn.tracker.net",
    "intranet.lan",
];

fn s(domain: &str) -> String {
    domain.to_string()
}

/// A few representative trees over the same leaves
fn sample_trees() -> Vec<FilterRef<String>> {
    let ads: FilterRef<String> = StubFilter::new(Some(1), &["ads.example.com"]);
    let trackers: FilterRef<String> =
        DomainListFilter::new(Some(2), "trackers", DomainMatchMode::Suffix, ["tracker.net"]);
    let or: FilterRef<String> = Arc::new(OrFilter::new(vec![ads.clone(), trackers.clone()]));
    let not_ads: FilterRef<String> = Arc::new(NegatingFilter::new(ads.clone()));
    let and: FilterRef<String> = Arc::new(AndFilter::new(vec![or.clone(), not_ads.clone()]));
    let cached: FilterRef<String> =
        Arc::new(CachingFilter::new(4, CacheMode::Blocked, or.clone()).unwrap());

    vec![ads, trackers, or, not_ads, and, cached]
}

#[test]
fn test_end_to_end_scenario() {
    let child = StubFilter::new(None, &["ads.example.com"]);
    let child_ref: FilterRef<String> = child.clone();
    let cf = CachingFilter::new(2, CacheMode::All, child_ref.clone()).unwrap();

    let expected = FilterDecision::new(s("ads.example.com"), true, Some(child_ref.clone()));
    assert_eq!(cf.is_blocked(&s("ads.example.com")), expected);
    assert_eq!(cf.is_blocked(&s("ads.example.com")), expected);
    assert_eq!(child.calls(), 1, "second lookup must be served from cache");

    assert!(!cf.is_blocked(&s("safe.example.com")).is_blocked());

    let nf = NegatingFilter::new(child_ref.clone());
    let decision = nf.is_blocked(&s("ads.example.com"));
    assert_eq!(
        decision,
        FilterDecision::new(s("ads.example.com"), false, Some(child_ref))
    );
}

#[test]
fn test_double_negation_involution() {
    for tree in sample_trees() {
        let not: FilterRef<String> = Arc::new(NegatingFilter::new(tree.clone()));
        let not_not = NegatingFilter::new(not);
        for domain in SAMPLE {
            let domain = s(domain);
            assert_eq!(
                not_not.is_blocked(&domain).is_blocked(),
                tree.is_blocked(&domain).is_blocked(),
                "{} on {}",
                domain,
                tree.name()
            );
        }
    }
}

#[test]
fn test_negation_preserves_provenance() {
    for tree in sample_trees() {
        let not = NegatingFilter::new(tree.clone());
        for domain in SAMPLE {
            let domain = s(domain);
            let base = tree.is_blocked(&domain);
            let negated = not.is_blocked(&domain);
            assert_eq!(negated.is_blocked(), !base.is_blocked());
            match (base.filter(), negated.filter()) {
                (Some(a), Some(b)) => assert!(Arc::ptr_eq(a, b)),
                (None, None) => {}
                _ => panic!("provenance changed for {} on {}", domain, tree.name()),
            }
        }
    }
}

#[test]
fn test_cache_transparency() {
    let child = StubFilter::new(Some(3), &["ads.example.com", "tracker.net"]);
    let cf = CachingFilter::new(64, CacheMode::All, child.clone() as FilterRef<String>).unwrap();

    for _ in 0..3 {
        for domain in SAMPLE {
            let domain = s(domain);
            let cached = cf.is_blocked(&domain);
            assert_eq!(cached.domain(), &domain);
            assert_eq!(
                cached.is_blocked(),
                child.blocked.contains(&domain),
                "wrong verdict for {}",
                domain
            );
        }
    }
    assert_eq!(child.calls(), SAMPLE.len());
}

#[test]
fn test_selective_caching_blocked_mode() {
    let child = StubFilter::new(None, &["ads.example.com"]);
    let cf =
        CachingFilter::new(64, CacheMode::Blocked, child.clone() as FilterRef<String>).unwrap();

    cf.is_blocked(&s("safe.example.com"));
    cf.is_blocked(&s("safe.example.com"));
    assert_eq!(child.calls(), 2);

    cf.is_blocked(&s("ads.example.com"));
    cf.is_blocked(&s("ads.example.com"));
    assert_eq!(child.calls(), 3);
}

#[test]
fn test_capacity_bound_under_concurrency() {
    let child: FilterRef<String> = StubFilter::new(None, &["d7.example.com"]);
    let cf: Arc<CachingFilter<String>> =
        Arc::new(CachingFilter::new(100, CacheMode::All, child).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cf = Arc::clone(&cf);
            thread::spawn(move || {
                for i in 0..1000 {
                    let domain = format!("d{}.example.com", (i * 13 + t * 101) % 400);
                    let decision = cf.is_blocked(&domain);
                    assert_eq!(decision.is_blocked(), domain == "d7.example.com");
                    assert!(cf.cache_len() <= 100);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cf.cache_len() <= 100);
}

#[test]
fn test_metadata_delegation() {
    let child: FilterRef<String> = StubFilter::new(Some(11), &["a.com", "b.com", "c.com"]);
    let decorators: Vec<FilterRef<String>> = vec![
        Arc::new(NegatingFilter::new(child.clone())),
        Arc::new(CachingFilter::new(8, CacheMode::NonBlocked, child.clone()).unwrap()),
    ];

    for decorator in decorators {
        assert_eq!(decorator.list_id(), child.list_id());
        assert_eq!(decorator.size(), child.size());
        let children = decorator.child_filters();
        assert_eq!(children.len(), 1);
        assert!(Arc::ptr_eq(&children[0], &child));
    }
}

#[test]
fn test_enumeration_refused_anywhere_below_negation() {
    let ads: FilterRef<String> =
        DomainListFilter::new(Some(1), "ads", DomainMatchMode::Exact, ["ads.example.com"]);
    let not: FilterRef<String> = Arc::new(NegatingFilter::new(ads.clone()));
    let cached: FilterRef<String> =
        Arc::new(CachingFilter::new(8, CacheMode::All, not).unwrap());
    let or = OrFilter::new(vec![ads.clone(), cached]);

    match or.domains() {
        Err(FilterError::Unsupported { filter, .. }) => assert_eq!(filter, "(not ads)"),
        Err(e) => panic!("unexpected error: {}", e),
        Ok(_) => panic!("enumeration through a negation must fail"),
    }

    let plain: Vec<String> = ads.domains().unwrap().collect();
    assert_eq!(plain, vec!["ads.example.com"]);
}

#[test]
fn test_compiled_tree_from_json() {
    let config = FilterConfig::from_json(
        r#"{
            "type": "cache", "capacity": 128, "mode": "all",
            "child": {"type": "and", "children": [
                {"type": "or", "children": [
                    {"type": "list", "list_id": 1, "name": "ads", "mode": "suffix",
                     "domains": ["ads.example.com", "banner.example.org"]},
                    {"type": "list", "list_id": 2, "name": "trackers", "mode": "suffix",
                     "domains": ["tracker.net"]}
                ]},
                {"type": "not", "child":
                    {"type": "list", "list_id": 3, "name": "allowed", "domains": ["ok.tracker.net"]}}
            ]}
        }"#,
    )
    .unwrap();

    let root = compile(&config).unwrap();
    assert_eq!(
        root.name(),
        "(cache (and (or ads trackers) (not allowed)))"
    );

    let decision = root.is_blocked(&s("x.ads.example.com"));
    assert!(decision.is_blocked());
    // The last AND child confirmed the block; it is a negated list, so the
    // provenance is the allow list underneath.
    assert_eq!(decision.filter().and_then(|f| f.list_id()), Some(3));

    assert!(root.is_blocked(&s("banner.example.org")).is_blocked());
    assert!(root.is_blocked(&s("cdn.tracker.net")).is_blocked());

    let allowed = root.is_blocked(&s("ok.tracker.net"));
    assert!(!allowed.is_blocked());
    assert_eq!(allowed.filter().and_then(|f| f.list_id()), Some(3));

    let unknown = root.is_blocked(&s("example.net"));
    assert!(!unknown.is_blocked());
    assert!(unknown.filter().is_none());
}
