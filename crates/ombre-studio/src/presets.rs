use ombre_engine::time::Preset;

/// Built-in looks for the animated preview, in menu order.
pub const PRESETS: [Preset; 5] = [
    Preset {
        name: "Oceanic Flow",
        colors: &[[0.1, 0.4, 0.8], [0.2, 0.8, 0.6], [0.05, 0.2, 0.4]],
        grain_intensity: 0.15,
        blob_smoothness: 1.2,
        noise_scale: 1.5,
    },
    Preset {
        name: "Sunset Blobs",
        colors: &[[0.9, 0.3, 0.4], [1.0, 0.6, 0.2], [0.4, 0.1, 0.5]],
        grain_intensity: 0.1,
        blob_smoothness: 0.8,
        noise_scale: 2.0,
    },
    Preset {
        name: "Cotton Candy",
        colors: &[[1.0, 0.8, 0.9], [0.8, 0.9, 1.0], [0.9, 1.0, 0.8]],
        grain_intensity: 0.2,
        blob_smoothness: 1.5,
        noise_scale: 1.0,
    },
    Preset {
        name: "Deep Space",
        colors: &[[0.05, 0.05, 0.2], [0.1, 0.0, 0.15], [0.0, 0.1, 0.1]],
        grain_intensity: 0.25,
        blob_smoothness: 1.0,
        noise_scale: 3.0,
    },
    Preset {
        name: "Tropical Dream",
        colors: &[[1.0, 0.4, 0.0], [0.0, 0.8, 0.8], [0.8, 0.0, 0.4]],
        grain_intensity: 0.12,
        blob_smoothness: 0.9,
        noise_scale: 1.8,
    },
];

/// Index of the preset called `name` (case-insensitive).
pub fn position(name: &str) -> Option<usize> {
    PRESETS
        .iter()
        .position(|p| p.name.eq_ignore_ascii_case(name.trim()))
}

pub fn names() -> Vec<&'static str> {
    PRESETS.iter().map(|p| p.name).collect()
}
