use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    brand::model::{Alignment, BackgroundMode, BrandVisual, Density},
    foundation::math::hash_str,
    layout::engine::{LAYOUT_SPLIT, LAYOUT_TYPE_ONLY},
};

/// The deterministic style tuple chosen for one render.
///
/// Pure and ephemeral: recomputed per call, identical inputs always yield an
/// identical plan so a rejected or edited post can be regenerated exactly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StylePlan {
    pub layout: String,
    pub density: Density,
    pub alignment: Alignment,
    pub background: BackgroundMode,
}

/// Pick a style plan from the brand's allowed variants.
///
/// Layout selection is weighted roulette over a salted 32-bit hash; the
/// density/alignment/background axes are uniform picks, each under its own
/// salt so reweighting one axis never perturbs another.
pub fn build_style_plan(
    visual: &BrandVisual,
    topic: Option<&str>,
    has_image: bool,
    seed: Option<&str>,
) -> StylePlan {
    let base = seed.or(topic).unwrap_or("");

    let candidates = layout_candidates(&visual.layouts, has_image);
    let layout = pick_weighted(
        &candidates,
        &visual.variants.layout_weights,
        &format!("{base}:layout"),
    );

    let density = pick_uniform(
        &visual.variants.densities,
        visual.density,
        &format!("{base}:density"),
    );
    let alignment = pick_uniform(
        &visual.variants.alignments,
        visual.alignment,
        &format!("{base}:alignment"),
    );
    let background = pick_uniform(
        &visual.variants.backgrounds,
        visual.background,
        &format!("{base}:background"),
    );

    StylePlan {
        layout,
        density,
        alignment,
        background,
    }
}

/// An image must never land on a text-only template, and a text-only render
/// must never claim an image template.
fn layout_candidates(layouts: &[String], has_image: bool) -> Vec<String> {
    if has_image {
        let with_image: Vec<String> = layouts
            .iter()
            .filter(|l| l.as_str() != LAYOUT_TYPE_ONLY)
            .cloned()
            .collect();
        if with_image.is_empty() {
            vec![LAYOUT_SPLIT.to_string()]
        } else {
            with_image
        }
    } else {
        let type_only: Vec<String> = layouts
            .iter()
            .filter(|l| l.as_str() == LAYOUT_TYPE_ONLY)
            .cloned()
            .collect();
        if type_only.is_empty() {
            vec![LAYOUT_TYPE_ONLY.to_string()]
        } else {
            type_only
        }
    }
}

/// Deterministic roulette-wheel sample: hash modulo the weight total, then
/// walk candidates subtracting weights until the cursor goes negative.
fn pick_weighted(candidates: &[String], weights: &BTreeMap<String, u32>, salt: &str) -> String {
    debug_assert!(!candidates.is_empty());
    let weight_of = |name: &str| -> u64 { u64::from(weights.get(name).copied().unwrap_or(1).max(1)) };

    let total: u64 = candidates.iter().map(|c| weight_of(c)).sum();
    let mut cursor = i64::try_from(u64::from(hash_str(salt)) % total).unwrap_or(0);
    for candidate in candidates {
        cursor -= i64::try_from(weight_of(candidate)).unwrap_or(1);
        if cursor < 0 {
            return candidate.clone();
        }
    }
    // Unreachable for non-empty candidates; keep the last as a total fallback.
    candidates[candidates.len() - 1].clone()
}

fn pick_uniform<T: Copy>(choices: &[T], default: T, salt: &str) -> T {
    if choices.is_empty() {
        default
    } else {
        choices[hash_str(salt) as usize % choices.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visual_with(layouts: &[&str]) -> BrandVisual {
        serde_json::from_value(serde_json::json!({
            "palette": {
                "background": "#f5f1e8",
                "primary": "#1d3557",
                "accent": "#e63946"
            },
            "typography": {
                "sizes": { "sm": 28.0, "md": 44.0, "lg": 64.0, "display": 92.0 }
            },
            "layouts": layouts
        }))
        .unwrap()
    }

    #[test]
    fn identical_inputs_yield_identical_plans() {
        let v = visual_with(&["split", "overlay", "card"]);
        let a = build_style_plan(&v, Some("launch week"), true, Some("abc"));
        let b = build_style_plan(&v, Some("launch week"), true, Some("abc"));
        assert_eq!(a, b);
    }

    #[test]
    fn no_image_forces_type_only() {
        let v = visual_with(&["split", "type-only"]);
        let plan = build_style_plan(&v, Some("x"), false, None);
        assert_eq!(plan.layout, "type-only");
    }

    #[test]
    fn no_image_falls_back_when_brand_lists_no_type_only() {
        let v = visual_with(&["split", "overlay"]);
        let plan = build_style_plan(&v, Some("x"), false, None);
        assert_eq!(plan.layout, "type-only");
    }

    #[test]
    fn image_never_lands_on_type_only() {
        let v = visual_with(&["split", "overlay", "type-only"]);
        for topic in ["a", "b", "c", "d", "e", "f", "g", "h"] {
            let plan = build_style_plan(&v, Some(topic), true, None);
            assert_ne!(plan.layout, "type-only");
        }
    }

    #[test]
    fn image_with_only_type_only_falls_back_to_split() {
        let v = visual_with(&["type-only"]);
        let plan = build_style_plan(&v, Some("x"), true, None);
        assert_eq!(plan.layout, "split");
    }

    #[test]
    fn seed_takes_precedence_over_topic() {
        let v = visual_with(&["split", "overlay", "card", "full-bleed"]);
        let seeded = build_style_plan(&v, Some("topic-a"), true, Some("pin"));
        let other_topic = build_style_plan(&v, Some("topic-b"), true, Some("pin"));
        assert_eq!(seeded, other_topic);
    }

    #[test]
    fn axes_are_independently_salted() {
        // Adding density variants must not perturb the layout choice.
        let mut v = visual_with(&["split", "overlay", "card", "full-bleed"]);
        let before = build_style_plan(&v, Some("t"), true, None);
        v.variants.densities = vec![Density::Relaxed, Density::Tight];
        let after = build_style_plan(&v, Some("t"), true, None);
        assert_eq!(before.layout, after.layout);
        assert_eq!(before.alignment, after.alignment);
        assert_eq!(before.background, after.background);
    }

    #[test]
    fn weighted_pick_biases_toward_heavy_candidates() {
        let mut v = visual_with(&["split", "overlay"]);
        v.variants.layout_weights = [("split".to_string(), 1), ("overlay".to_string(), 9)]
            .into_iter()
            .collect();

        let mut overlay = 0usize;
        let rounds = 2000usize;
        for i in 0..rounds {
            let topic = format!("topic-{i}");
            let plan = build_style_plan(&v, Some(&topic), true, None);
            if plan.layout == "overlay" {
                overlay += 1;
            }
        }
        let share = overlay as f64 / rounds as f64;
        assert!(
            (0.85..0.95).contains(&share),
            "overlay share {share} outside the expected 9:1 band"
        );
    }

    #[test]
    fn zero_weight_is_clamped_to_one() {
        let mut v = visual_with(&["split", "overlay"]);
        v.variants.layout_weights = [("split".to_string(), 0), ("overlay".to_string(), 0)]
            .into_iter()
            .collect();
        let mut seen_split = false;
        for i in 0..64 {
            let topic = format!("t{i}");
            if build_style_plan(&v, Some(&topic), true, None).layout == "split" {
                seen_split = true;
                break;
            }
        }
        assert!(seen_split, "clamped weights must keep every candidate reachable");
    }

    #[test]
    fn uniform_axes_fall_back_to_brand_default() {
        let v = visual_with(&["split"]);
        let plan = build_style_plan(&v, Some("t"), true, None);
        assert_eq!(plan.density, Density::Moderate);
        assert_eq!(plan.alignment, Alignment::Left);
        assert_eq!(plan.background, BackgroundMode::Light);
    }
}
