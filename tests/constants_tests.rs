// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants module

use camera_session::ResolutionCandidate;
use camera_session::constants::{
    ANY_RESOLUTION_IDEAL, DEFAULT_CAPTURE_SCALE, MAX_CAPTURE_SCALE, ResolutionPreset,
};

#[test]
fn test_resolution_preset_values() {
    // Test that all presets exist (4K, QHD, Full HD, HD, VGA)
    assert_eq!(ResolutionPreset::ALL.len(), 5);
}

#[test]
fn test_resolution_preset_ordering() {
    // Test that presets are ordered from highest to lowest resolution
    let mut prev = u64::MAX;
    for preset in ResolutionPreset::ALL {
        let pixels = preset.resolution().pixels();
        assert!(pixels < prev, "Presets should be ordered from highest to lowest");
        prev = pixels;
    }
}

#[test]
fn test_resolution_preset_display_names() {
    // Test that all presets have non-empty display names
    for preset in ResolutionPreset::ALL {
        assert!(!preset.display_name().is_empty());
    }
}

#[test]
fn test_standard_presets_become_candidates() {
    let candidates = ResolutionCandidate::standard_presets();
    assert_eq!(candidates.len(), ResolutionPreset::ALL.len());
    assert_eq!(candidates[0].id, "3840x2160");
    assert_eq!(candidates[0].label, ResolutionPreset::Uhd4K.display_name());
}

#[test]
fn test_capture_scale_bounds() {
    assert!(DEFAULT_CAPTURE_SCALE > 0.0);
    assert!(DEFAULT_CAPTURE_SCALE <= MAX_CAPTURE_SCALE);
}

#[test]
fn test_any_resolution_hint_is_landscape() {
    assert!(ANY_RESOLUTION_IDEAL.width >= ANY_RESOLUTION_IDEAL.height);
}
