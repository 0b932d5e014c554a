mod common;

use common::{moscow_moment, FixedProvider};
use horoscope::aspects::{AspectKind, AspectSettings, ChartPoint};
use horoscope::ephemeris::{AnalyticEphemeris, Body, BodyPosition, EphemerisSnapshot};
use horoscope::houses::HouseCusps;
use horoscope::time::{BirthTime, JulianDay};
use horoscope::transit::{compare_hits, ScoringPolicy, TransitScorer, MIN_ORB_CLOSENESS};
use horoscope::{Engine, NatalChart};
use chrono::{TimeZone, Utc};
use std::cmp::Ordering;
use std::sync::Arc;

const NATAL: [f64; 10] = [0.0, 45.0, 100.0, 150.0, 200.0, 250.0, 300.0, 330.0, 15.0, 75.0];

async fn fixed_natal(with_houses: bool) -> NatalChart {
    let mut provider = FixedProvider::new(NATAL);
    if !with_houses {
        provider = provider.without_houses();
    }
    Engine::new(Arc::new(provider))
        .natal_chart(&moscow_moment(Some(BirthTime::NOON)))
        .await
        .unwrap()
}

fn sky_with(body: Body, longitude: f64) -> EphemerisSnapshot {
    EphemerisSnapshot {
        julian_day: JulianDay(2_460_000.5),
        bodies: Body::ALL
            .iter()
            .map(|&b| {
                if b == body {
                    BodyPosition::computed(b, longitude, 0.0).with_speed(0.2)
                } else {
                    BodyPosition::unavailable(b)
                }
            })
            .collect(),
        // Observer data in the transit sky must be ignored.
        houses: Some(HouseCusps::whole_sign(200.0, 100.0)),
    }
}

#[tokio::test]
async fn test_score_is_product_of_weights() {
    let natal = fixed_natal(true).await;
    let hits = TransitScorer::new().score(
        &natal,
        &sky_with(Body::Jupiter, 120.0),
        &AspectSettings::default(),
        &ScoringPolicy::default(),
    );

    let summary: Vec<(ChartPoint, AspectKind)> = hits.iter().map(|h| (h.target, h.aspect)).collect();
    assert_eq!(
        summary,
        vec![
            (ChartPoint::Body(Body::Sun), AspectKind::Trine),
            (ChartPoint::Ascendant, AspectKind::Trine),
            (ChartPoint::Body(Body::Saturn), AspectKind::Opposition),
        ]
    );

    // Jupiter 1.2 × trine 0.8 × Sun 1.3 × house 5 (succedent) 1.0 × exact 1.0
    assert!((hits[0].score - 1.248).abs() < 1e-9);
    assert_eq!(hits[0].house, Some(5));
    assert_eq!(hits[0].transiting, Body::Jupiter);
    assert!((hits[1].score - 1.152).abs() < 1e-9);
    assert!((hits[2].score - 0.864).abs() < 1e-9);
}

#[tokio::test]
async fn test_orb_reduces_score_linearly() {
    let natal = fixed_natal(true).await;
    let exact = TransitScorer::new().score(
        &natal,
        &sky_with(Body::Jupiter, 120.0),
        &AspectSettings::default(),
        &ScoringPolicy::default(),
    );
    let off = TransitScorer::new().score(
        &natal,
        &sky_with(Body::Jupiter, 123.0),
        &AspectSettings::default(),
        &ScoringPolicy::default(),
    );
    let sun = |hits: &[horoscope::TransitHit]| {
        hits.iter()
            .find(|h| h.target == ChartPoint::Body(Body::Sun))
            .map(|h| h.score)
            .unwrap()
    };
    // Trine orb 6°, 3° off → half score
    assert!((sun(&off) - sun(&exact) * 0.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_hit_on_the_orb_limit_still_scores() {
    let natal = fixed_natal(true).await;
    // 126° from the natal Sun: trine with exactly the default 6° orb
    let hits = TransitScorer::new().score(
        &natal,
        &sky_with(Body::Jupiter, 126.0),
        &AspectSettings::default(),
        &ScoringPolicy::default(),
    );
    let sun = hits
        .iter()
        .find(|h| h.target == ChartPoint::Body(Body::Sun))
        .unwrap();
    assert_eq!(sun.aspect, AspectKind::Trine);
    assert_eq!(sun.orb, 6.0);
    assert!(sun.score > 0.0);
    assert!((sun.score - 1.248 * MIN_ORB_CLOSENESS).abs() < 1e-9);
    assert!(hits.iter().all(|h| h.score > 0.0));
}

#[tokio::test]
async fn test_chart_without_houses_has_no_angle_targets() {
    let natal = fixed_natal(false).await;
    let hits = TransitScorer::new().score(
        &natal,
        &sky_with(Body::Jupiter, 120.0),
        &AspectSettings::default(),
        &ScoringPolicy::default(),
    );
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|h| h.house.is_none()));
    assert!(hits
        .iter()
        .all(|h| !matches!(h.target, ChartPoint::Ascendant | ChartPoint::Midheaven)));
}

#[tokio::test]
async fn test_ranked_list_is_a_total_order_and_reproducible() {
    let engine = Engine::new(Arc::new(AnalyticEphemeris::new()));
    let natal = engine
        .natal_chart(&moscow_moment(Some(BirthTime::new(7, 30, 0.0))))
        .await
        .unwrap();
    let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();

    let first = engine.transits(&natal, now).await.unwrap();
    let second = engine.transits(&natal, now).await.unwrap();
    assert_eq!(first, second);
    assert!(!first.is_empty());

    for pair in first.windows(2) {
        assert_eq!(compare_hits(&pair[0], &pair[1]), Ordering::Less);
        assert!(pair[0].score >= pair[1].score);
    }
    for hit in &first {
        assert!(hit.score > 0.0);
        assert!(hit.orb <= AspectSettings::default().max_orb(hit.aspect));
    }
}
