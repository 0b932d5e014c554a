mod common;

use chrono::{NaiveDate, TimeZone, Timelike, Utc};
use common::{moscow_moment, FixedProvider};
use horoscope::aspects::{AspectKind, ChartPoint, Tightness};
use horoscope::ephemeris::{AnalyticEphemeris, Body};
use horoscope::report::{
    DaySlot, LifeArea, MoonPhase, ReportBuilder, ReportSettings, SlotHits, Tone,
};
use horoscope::time::{BirthTime, ZoneSpec};
use horoscope::{Engine, NatalChart, TransitHit};
use std::sync::Arc;

async fn natal() -> NatalChart {
    Engine::new(Arc::new(FixedProvider::new([
        0.0, 45.0, 100.0, 150.0, 200.0, 250.0, 300.0, 330.0, 15.0, 75.0,
    ])))
    .natal_chart(&moscow_moment(Some(BirthTime::NOON)))
    .await
    .unwrap()
}

fn hit(transiting: Body, aspect: AspectKind, house: Option<u8>, score: f64) -> TransitHit {
    TransitHit {
        transiting,
        target: ChartPoint::Body(Body::Sun),
        aspect,
        exact_angle: aspect.exact_angle(),
        orb: 1.0,
        tightness: Tightness::Tight,
        house,
        retrograde: false,
        applying: None,
        score,
    }
}

#[tokio::test]
async fn test_sections_are_bucketed_and_bounded() {
    let natal = natal().await;
    let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    let mut hits: Vec<TransitHit> = (0..7)
        .map(|i| hit(Body::Venus, AspectKind::Trine, Some(5), 2.0 - i as f64 * 0.1))
        .collect();
    hits.push(hit(Body::Saturn, AspectKind::Square, Some(10), 0.5));

    let builder = ReportBuilder::new(ReportSettings {
        top_n: 10,
        max_items_per_section: 5,
    });
    let report = builder.build(date, now, &natal, &hits, None, &[]);

    assert_eq!(report.key_transits.len(), 8);
    assert_eq!(report.sections.len(), LifeArea::ALL.len());
    for section in &report.sections {
        assert!(section.items.len() <= 5);
        assert_eq!(section.items.is_empty(), section.placeholder.is_some());
    }
    let love = report.sections.iter().find(|s| s.area == LifeArea::Love).unwrap();
    assert_eq!(love.items.len(), 5);
    assert!(love.items[0].rendered.text.contains("Venus trine your Sun"));
    let work = report.sections.iter().find(|s| s.area == LifeArea::Work).unwrap();
    assert_eq!(work.items.len(), 1);
    assert!(work.items[0].rendered.template_id.starts_with("transit.challenging."));
    let general = report.sections.iter().find(|s| s.area == LifeArea::General).unwrap();
    assert!(general
        .placeholder
        .as_ref()
        .unwrap()
        .template_id
        .starts_with("section.general."));
}

#[tokio::test]
async fn test_top_n_limits_the_report() {
    let natal = natal().await;
    let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    let hits: Vec<TransitHit> = (0..6)
        .map(|i| hit(Body::Mars, AspectKind::Square, None, 1.0 - i as f64 * 0.1))
        .collect();
    let report = ReportBuilder::new(ReportSettings {
        top_n: 3,
        max_items_per_section: 5,
    })
    .build(date, now, &natal, &hits, None, &[]);
    assert_eq!(report.key_transits.len(), 3);
    let general = report.sections.iter().find(|s| s.area == LifeArea::General).unwrap();
    assert_eq!(general.items.len(), 3);
}

#[tokio::test]
async fn test_phrasing_is_stable_for_a_date() {
    let natal = natal().await;
    let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    let hits = vec![hit(Body::Jupiter, AspectKind::Sextile, Some(9), 1.0)];
    let slots = vec![SlotHits {
        slot: DaySlot::Morning,
        at: now,
        hits: hits.clone(),
    }];
    let builder = ReportBuilder::default();
    let a = builder.build(date, now, &natal, &hits, None, &slots);
    let b = builder.build(date, now, &natal, &hits, None, &slots);
    assert_eq!(a, b);
    assert_eq!(a.time_of_day[0].tone, Tone::Harmonious);
}

#[tokio::test]
async fn test_daily_report_end_to_end() {
    let engine = Engine::new(Arc::new(AnalyticEphemeris::new()));
    let natal = engine
        .natal_chart(&moscow_moment(Some(BirthTime::new(7, 30, 0.0))))
        .await
        .unwrap();
    let now = Utc.with_ymd_and_hms(2024, 6, 10, 21, 30, 0).unwrap();

    let report = engine.daily_report(&natal, now).await.unwrap();
    // 21:30 UT is already the 11th in Moscow (UTC+3)
    assert_eq!(report.date, NaiveDate::from_ymd_opt(2024, 6, 11).unwrap());
    assert!(report.key_transits.len() <= 10);

    let hours: Vec<u32> = report.time_of_day.iter().map(|s| s.at.hour()).collect();
    assert_eq!(hours, vec![5, 10, 16]);
    assert_eq!(
        report.time_of_day.iter().map(|s| s.slot).collect::<Vec<_>>(),
        DaySlot::ALL.to_vec()
    );

    let moon = report.moon.as_ref().unwrap();
    assert!((0.0..=1.0).contains(&moon.illumination));
    // New moon fell on 2024-06-06
    assert!(matches!(
        moon.phase,
        MoonPhase::WaxingCrescent | MoonPhase::FirstQuarter
    ));

    let again = engine.daily_report(&natal, now).await.unwrap();
    assert_eq!(report, again);

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["sections"].is_array());
    assert_eq!(json["time_of_day"][0]["slot"], "morning");
}

#[tokio::test]
async fn test_slots_follow_the_offset_in_force_on_dst_day() {
    let engine = Engine::new(Arc::new(FixedProvider::new([
        0.0, 45.0, 100.0, 150.0, 200.0, 250.0, 300.0, 330.0, 15.0, 75.0,
    ])));
    let mut moment = moscow_moment(Some(BirthTime::NOON));
    moment.zone = ZoneSpec::Iana("America/Los_Angeles".to_string());
    let natal = engine.natal_chart(&moment).await.unwrap();

    // Los Angeles moved to PDT at 10:00 UT on 2021-03-14
    let now = Utc.with_ymd_and_hms(2021, 3, 14, 18, 0, 0).unwrap();
    let report = engine.daily_report(&natal, now).await.unwrap();
    assert_eq!(report.date, NaiveDate::from_ymd_opt(2021, 3, 14).unwrap());

    let hours: Vec<u32> = report.time_of_day.iter().map(|s| s.at.hour()).collect();
    assert_eq!(hours, vec![15, 20, 2]);
}
