//! Page-level behavior: tab mounting, slider flow and rendering.

use orgflow::page::PAGE_TITLE;
use orgflow::transfer::HIGH_CONSTRAINT;
use orgflow::{render_view, Intensity, OrgFlowError, OrgFlowPage, PageConfig, ViewTab};

fn page() -> OrgFlowPage {
    OrgFlowPage::new(PageConfig::default()).unwrap()
}

#[test]
fn switching_tabs_changes_mounted_series() {
    let mut p = page();
    let names = |p: &OrgFlowPage| -> Vec<String> {
        p.chart().unwrap().series.iter().map(|s| s.name.clone()).collect()
    };
    assert_eq!(names(&p), ["High-Constraint", "Adaptive"]);

    assert!(p.select_tab(ViewTab::StructureA).unwrap());
    assert_eq!(names(&p), ["Raw Data", "Departmental", "Organizational", "Executive"]);
    assert_eq!(p.active_view(), ViewTab::StructureA);
    assert_eq!(p.tabs().triggers().filter(|t| t.is_active()).count(), 1);
}

#[test]
fn reselecting_active_tab_does_not_remount() {
    let mut p = page();
    let mounts = p.mount_count();
    assert!(!p.select_tab(ViewTab::Comparative).unwrap());
    assert_eq!(p.mount_count(), mounts);

    p.select_tab(ViewTab::StructureB).unwrap();
    let mounts = p.mount_count();
    assert!(!p.select_tab(ViewTab::StructureB).unwrap());
    assert_eq!(p.mount_count(), mounts);
}

#[test]
fn slider_input_resamples_active_view() {
    let mut p = page();
    p.select_tab(ViewTab::StructureA).unwrap();
    let i = p.slider_input(50.0);
    assert_eq!(i, Intensity::new(0.5));

    let chart = p.chart().unwrap();
    let first: Vec<f64> = chart.series.iter().map(|s| s.points[0].1).collect();
    assert_eq!(first[0], 2.0);
    assert_eq!(first[1], 0.0);
    assert_eq!(first[2], 4.0);
    assert!((first[3] - 6.21341642929905).abs() < 1e-12);

    let x5 = chart.series[1].points[20];
    assert_eq!(x5, (5.0, HIGH_CONSTRAINT.departmental(5.0, 0.5)));
}

#[test]
fn config_sets_initial_state() {
    let cfg = PageConfig::from_json(r#"{ "initial_intensity": 30, "initial_view": "structureB" }"#).unwrap();
    let p = OrgFlowPage::new(cfg).unwrap();
    assert_eq!(p.active_view(), ViewTab::StructureB);
    assert_eq!(p.intensity().percent(), 30);
}

#[test]
fn render_produces_full_buffer() {
    let p = page();
    let surface = p.render().unwrap();
    let cfg = p.config();
    assert_eq!(surface.data().len(), (cfg.width * cfg.height * 4) as usize);
    // page background in the top-left corner
    assert_eq!(surface.pixel(2, 2), [249, 250, 251, 255]);
    assert!(!PAGE_TITLE.is_empty());
}

#[test]
fn views_render_differently() {
    let cfg = PageConfig::default();
    let a = render_view(ViewTab::StructureA, Intensity::new(0.5), &cfg).unwrap();
    let b = render_view(ViewTab::StructureB, Intensity::new(0.5), &cfg).unwrap();
    let c = render_view(ViewTab::StructureA, Intensity::new(0.5), &cfg).unwrap();
    assert_ne!(a.data(), b.data());
    assert_eq!(a.data(), c.data());
}

#[test]
fn tiny_pages_are_rejected() {
    let cfg = PageConfig { width: 0, ..PageConfig::default() };
    assert!(matches!(OrgFlowPage::new(cfg), Err(OrgFlowError::InvalidSurface { .. })));
}
