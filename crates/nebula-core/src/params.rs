//! User-tunable visual parameters and their control ranges.

/// One tunable value exposed on the control panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Param {
    Red,
    Green,
    Blue,
    BloomThreshold,
    BloomStrength,
    BloomRadius,
    NoiseScale,
    DisplacementScale,
    Volume,
}

/// Control range, label and default for a [`Param`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub group: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub default: f32,
}

impl Param {
    pub const ALL: [Param; 9] = [
        Param::Red,
        Param::Green,
        Param::Blue,
        Param::BloomThreshold,
        Param::BloomStrength,
        Param::BloomRadius,
        Param::NoiseScale,
        Param::DisplacementScale,
        Param::Volume,
    ];

    pub const fn spec(self) -> ParamSpec {
        match self {
            Param::Red => spec("red", "Red", "Colors", 0.0, 1.0, 0.01, 0.0),
            Param::Green => spec("green", "Green", "Colors", 0.0, 1.0, 0.01, 0.02),
            Param::Blue => spec("blue", "Blue", "Colors", 0.0, 1.0, 0.01, 0.5),
            Param::BloomThreshold => spec("threshold", "Threshold", "Bloom", 0.0, 1.0, 0.01, 0.0),
            Param::BloomStrength => spec("strength", "Strength", "Bloom", 0.0, 3.0, 0.01, 0.7),
            Param::BloomRadius => spec("radius", "Radius", "Bloom", 0.0, 1.0, 0.01, 0.0),
            Param::NoiseScale => spec("noiseScale", "Noise Scale", "Noise", 0.1, 10.0, 0.1, 1.5),
            Param::DisplacementScale => spec(
                "displacementScale",
                "Displacement Scale",
                "Noise",
                0.1,
                10.0,
                0.1,
                3.0,
            ),
            Param::Volume => spec("volume", "Volume", "Audio", 0.0, 1.0, 0.01, 0.5),
        }
    }

    pub fn from_key(key: &str) -> Option<Param> {
        Param::ALL.into_iter().find(|p| p.spec().key == key)
    }

    /// Clamp `value` into this parameter's control range. NaN maps to the default.
    pub fn clamp(self, value: f32) -> f32 {
        let s = self.spec();
        if value.is_nan() {
            return s.default;
        }
        value.clamp(s.min, s.max)
    }
}

const fn spec(
    key: &'static str,
    label: &'static str,
    group: &'static str,
    min: f32,
    max: f32,
    step: f32,
    default: f32,
) -> ParamSpec {
    ParamSpec {
        key,
        label,
        group,
        min,
        max,
        step,
        default,
    }
}

/// Current values of every tunable plus the loaded track's display name.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualParams {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub bloom_threshold: f32,
    pub bloom_strength: f32,
    pub bloom_radius: f32,
    pub noise_scale: f32,
    pub displacement_scale: f32,
    pub volume: f32,
    pub file_name: String,
}

impl VisualParams {
    pub fn defaults(file_name: impl Into<String>) -> Self {
        Self {
            red: Param::Red.spec().default,
            green: Param::Green.spec().default,
            blue: Param::Blue.spec().default,
            bloom_threshold: Param::BloomThreshold.spec().default,
            bloom_strength: Param::BloomStrength.spec().default,
            bloom_radius: Param::BloomRadius.spec().default,
            noise_scale: Param::NoiseScale.spec().default,
            displacement_scale: Param::DisplacementScale.spec().default,
            volume: Param::Volume.spec().default,
            file_name: file_name.into(),
        }
    }

    pub fn get(&self, param: Param) -> f32 {
        match param {
            Param::Red => self.red,
            Param::Green => self.green,
            Param::Blue => self.blue,
            Param::BloomThreshold => self.bloom_threshold,
            Param::BloomStrength => self.bloom_strength,
            Param::BloomRadius => self.bloom_radius,
            Param::NoiseScale => self.noise_scale,
            Param::DisplacementScale => self.displacement_scale,
            Param::Volume => self.volume,
        }
    }

    /// Stores the clamped value and returns it.
    pub fn set(&mut self, param: Param, value: f32) -> f32 {
        let v = param.clamp(value);
        let slot = match param {
            Param::Red => &mut self.red,
            Param::Green => &mut self.green,
            Param::Blue => &mut self.blue,
            Param::BloomThreshold => &mut self.bloom_threshold,
            Param::BloomStrength => &mut self.bloom_strength,
            Param::BloomRadius => &mut self.bloom_radius,
            Param::NoiseScale => &mut self.noise_scale,
            Param::DisplacementScale => &mut self.displacement_scale,
            Param::Volume => &mut self.volume,
        };
        *slot = v;
        v
    }

    pub fn color(&self) -> [f32; 3] {
        [self.red, self.green, self.blue]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_specs_and_lie_in_range() {
        let p = VisualParams::defaults("x");
        for param in Param::ALL {
            let s = param.spec();
            assert_eq!(p.get(param), s.default, "{}", s.key);
            assert!(s.min <= s.default && s.default <= s.max, "{}", s.key);
        }
    }

    #[test]
    fn set_clamps_to_range() {
        let mut p = VisualParams::defaults("x");
        assert_eq!(p.set(Param::BloomStrength, 9.0), 3.0);
        assert_eq!(p.set(Param::NoiseScale, 0.0), 0.1);
        assert_eq!(p.set(Param::Volume, f32::NAN), 0.5);
        assert_eq!(p.bloom_strength, 3.0);
    }

    #[test]
    fn keys_round_trip_and_are_unique() {
        for param in Param::ALL {
            assert_eq!(Param::from_key(param.spec().key), Some(param));
        }
        assert_eq!(Param::from_key("nope"), None);
    }
}
