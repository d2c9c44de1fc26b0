//! Overlay view models
//!
//! The engine's 2D overlay is a black box; these types describe what should be on it.
//! Positions are offsets from the viewport center in points (y up).

use glam::Vec2;

use crate::sim::{DeathCause, OverlayScene};

/// Looping blink used by "tap to continue"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeLoop {
    pub fade_out_secs: f32,
    pub hold_secs: f32,
    pub fade_in_secs: f32,
}

pub const TAP_TO_CONTINUE_BLINK: FadeLoop = FadeLoop {
    fade_out_secs: 0.5,
    hold_secs: 2.0,
    fade_in_secs: 0.5,
};

/// One element of an overlay scene
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayElement {
    /// Static image, scaled to the viewport width minus a margin
    Image { name: &'static str, offset: Vec2 },
    /// Image that blinks forever
    BlinkingImage {
        name: &'static str,
        offset: Vec2,
        blink: FadeLoop,
    },
    /// Oxygen ring with a heart in the middle
    Gauge { offset: Vec2, reading: GaugeReading },
}

/// A full overlay scene
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub scene: OverlayScene,
    pub elements: Vec<OverlayElement>,
}

/// Horizontal margin the full-width images leave
pub const IMAGE_MARGIN: f32 = 50.0;

/// Image shown on the summary for each death cause
pub fn death_image(cause: DeathCause) -> Option<&'static str> {
    match cause {
        DeathCause::Lava => Some("caughtFire.png"),
        DeathCause::Oxygen => Some("outOfOxygen.png"),
        DeathCause::None => None,
    }
}

impl Overlay {
    /// Build the overlay for a scene. `viewport_width` positions the gauge.
    pub fn for_scene(scene: OverlayScene, viewport_width: f32) -> Self {
        let tap_to_continue = OverlayElement::BlinkingImage {
            name: "taptocontinue.png",
            offset: Vec2::new(0.0, -150.0),
            blink: TAP_TO_CONTINUE_BLINK,
        };

        let elements = match scene {
            OverlayScene::Splash => vec![
                OverlayElement::Image {
                    name: "welcome.png",
                    offset: Vec2::new(0.0, 200.0),
                },
                OverlayElement::Image {
                    name: "logo.png",
                    offset: Vec2::new(0.0, 50.0),
                },
                tap_to_continue,
            ],
            OverlayScene::Hud => vec![OverlayElement::Gauge {
                offset: Vec2::new(-viewport_width / 2.0 + 80.0, 250.0),
                reading: OxygenGauge::new().set_value(1.0),
            }],
            OverlayScene::Summary(cause) => {
                let mut elements = vec![
                    OverlayElement::Image {
                        name: "thank you.png",
                        offset: Vec2::new(0.0, -25.0),
                    },
                    tap_to_continue,
                ];
                if let Some(name) = death_image(cause) {
                    elements.push(OverlayElement::Image {
                        name,
                        offset: Vec2::new(0.0, 150.0),
                    });
                }
                elements
            }
        };

        Self { scene, elements }
    }
}

/// Gauge ring colour bands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeColor {
    Blue,
    Green,
    /// Red at 70% alpha
    FadedRed,
    Red,
}

impl GaugeColor {
    pub fn for_value(value: f64) -> Self {
        if value > 0.8 {
            GaugeColor::Blue
        } else if value > 0.6 {
            GaugeColor::Green
        } else if value > 0.3 {
            GaugeColor::FadedRed
        } else {
            GaugeColor::Red
        }
    }
}

/// What the gauge should show this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeReading {
    /// Clamped oxygen level
    pub value: f64,
    pub color: GaugeColor,
    /// Arc runs clockwise from 90 degrees to this angle
    pub end_angle_deg: f64,
    /// Start the heart pulse this frame
    pub pulse: bool,
}

/// Oxygen gauge state.
///
/// The heart pulses once when oxygen drops below the warning level and re-arms once
/// it climbs back above.
#[derive(Debug, Clone, Default)]
pub struct OxygenGauge {
    pulsing: bool,
}

/// Level below which the heart pulses
pub const GAUGE_PULSE_LEVEL: f64 = 0.2;
/// Heart pulse: grow by this factor, then shrink by the second, 0.5s each
pub const HEART_PULSE_SCALES: (f32, f32) = (1.5, 0.75);
pub const HEART_PULSE_STEP_SECS: f32 = 0.5;

impl OxygenGauge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_value(&mut self, value: f64) -> GaugeReading {
        let value = value.clamp(0.0, 1.0);

        let mut pulse = false;
        if !self.pulsing && value < GAUGE_PULSE_LEVEL {
            self.pulsing = true;
            pulse = true;
        }
        if value > GAUGE_PULSE_LEVEL {
            self.pulsing = false;
        }

        GaugeReading {
            value,
            color: GaugeColor::for_value(value),
            end_angle_deg: 90.0 - 360.0 * value,
            pulse,
        }
    }
}
