//! Parametric 2D profile curves for the eight printable shapes.
//!
//! Every shape is a sequence of [`PathCommand`]s authored in a normalized
//! frame: the `A` shapes live in the unit square and are meant to be revolved
//! about the vertical axis, the `B` shapes are closed outlines inside the unit
//! circle meant to be extruded and twisted.

use crate::error::GenerationError;
use bevy_math::Rot2;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::fmt;
use std::str::FromStr;

/// Samples used to approximate the arc length of a single cubic segment.
pub const ARC_LENGTH_DIVISIONS: usize = 200;

/// Tolerance below which two consecutive polyline points are merged.
const POINT_EPSILON: f32 = 1e-6;

/// Identifier of one of the eight printable shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeTag {
    A1,
    A2,
    A3,
    A4,
    B1,
    B2,
    B3,
    B4,
}

impl ShapeTag {
    pub const ALL: [ShapeTag; 8] = [
        ShapeTag::A1,
        ShapeTag::A2,
        ShapeTag::A3,
        ShapeTag::A4,
        ShapeTag::B1,
        ShapeTag::B2,
        ShapeTag::B3,
        ShapeTag::B4,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::A3 => "A3",
            Self::A4 => "A4",
            Self::B1 => "B1",
            Self::B2 => "B2",
            Self::B3 => "B3",
            Self::B4 => "B4",
        }
    }

    /// Builds the hand-authored profile for this shape.
    pub fn profile_curve(self) -> ProfileCurve {
        match self {
            Self::A1 => a1_curve(),
            Self::A2 => a2_curve(),
            Self::A3 => a3_curve(),
            Self::A4 => a4_curve(),
            Self::B1 => b1_curve(),
            Self::B2 => b2_curve(),
            Self::B3 => b3_curve(),
            Self::B4 => b4_curve(),
        }
    }
}

impl fmt::Display for ShapeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeTag {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| GenerationError::UnknownShape(s.to_string()))
    }
}

/// Looks up a profile curve by its tag name (`"A1"` .. `"B4"`).
pub fn get_profile_curve(shape: &str) -> Result<ProfileCurve, GenerationError> {
    Ok(shape.parse::<ShapeTag>()?.profile_curve())
}

/// A profile curve together with the way it turns into a solid.
///
/// The family is decided once, when the curve is built, so the generator
/// only ever matches on this enum.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeFamily {
    /// Open profile swept 360° about the vertical axis.
    Revolution(ProfileCurve),
    /// Closed cross-section swept along a straight depth.
    Extrusion(ProfileCurve),
}

impl ShapeFamily {
    pub fn of(tag: ShapeTag) -> Self {
        let curve = tag.profile_curve();
        match tag {
            ShapeTag::A1 | ShapeTag::A2 | ShapeTag::A3 | ShapeTag::A4 => Self::Revolution(curve),
            ShapeTag::B1 | ShapeTag::B2 | ShapeTag::B3 | ShapeTag::B4 => Self::Extrusion(curve),
        }
    }

    pub fn curve(&self) -> &ProfileCurve {
        match self {
            Self::Revolution(curve) | Self::Extrusion(curve) => curve,
        }
    }
}

/// A single drawing instruction of a profile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
    CubicTo { ctrl1: Vec2, ctrl2: Vec2, to: Vec2 },
}

/// A drawable piece of the curve between two consecutive commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Segment {
    Line(Vec2, Vec2),
    Cubic([Vec2; 4]),
}

impl Segment {
    /// Point at curve parameter `t ∈ [0, 1]` (not arc-length uniform for cubics).
    pub fn point(&self, t: f32) -> Vec2 {
        match *self {
            Self::Line(a, b) => a.lerp(b, t),
            Self::Cubic([p0, p1, p2, p3]) => {
                let k = 1.0 - t;
                p0 * (k * k * k) + p1 * (3.0 * k * k * t) + p2 * (3.0 * k * t * t) + p3 * (t * t * t)
            }
        }
    }

    pub fn start(&self) -> Vec2 {
        match *self {
            Self::Line(a, _) => a,
            Self::Cubic([p0, ..]) => p0,
        }
    }

    pub fn end(&self) -> Vec2 {
        match *self {
            Self::Line(_, b) => b,
            Self::Cubic([.., p3]) => p3,
        }
    }

    /// Cumulative chord lengths at `ARC_LENGTH_DIVISIONS + 1` uniform `t` samples.
    fn arc_lengths(&self) -> Vec<f32> {
        let mut lengths = Vec::with_capacity(ARC_LENGTH_DIVISIONS + 1);
        let mut last = self.point(0.0);
        let mut sum = 0.0;
        lengths.push(0.0);
        for i in 1..=ARC_LENGTH_DIVISIONS {
            let p = self.point(i as f32 / ARC_LENGTH_DIVISIONS as f32);
            sum += p.distance(last);
            lengths.push(sum);
            last = p;
        }
        lengths
    }

    pub fn length(&self) -> f32 {
        match *self {
            Self::Line(a, b) => a.distance(b),
            Self::Cubic(_) => self.arc_lengths()[ARC_LENGTH_DIVISIONS],
        }
    }

    /// Point at arc-length fraction `u ∈ [0, 1]` of this segment.
    pub fn point_at(&self, u: f32) -> Vec2 {
        match *self {
            Self::Line(a, b) => a.lerp(b, u),
            Self::Cubic(_) => self.point(self.u_to_t(u)),
        }
    }

    fn u_to_t(&self, u: f32) -> f32 {
        let lengths = self.arc_lengths();
        let total = lengths[ARC_LENGTH_DIVISIONS];
        if total <= 0.0 {
            return u;
        }
        let target = u.clamp(0.0, 1.0) * total;

        // first sample whose cumulative length reaches the target
        let i = lengths.partition_point(|&l| l < target).min(ARC_LENGTH_DIVISIONS);
        if i == 0 {
            return 0.0;
        }
        let before = lengths[i - 1];
        let span = lengths[i] - before;
        let fraction = if span > 0.0 { (target - before) / span } else { 0.0 };
        ((i - 1) as f32 + fraction) / ARC_LENGTH_DIVISIONS as f32
    }
}

/// An ordered sequence of move/line/cubic commands forming one planar curve.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileCurve {
    pub commands: Vec<PathCommand>,
}

impl ProfileCurve {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(Vec2::new(x, y)));
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.commands.push(PathCommand::LineTo(Vec2::new(x, y)));
        self
    }

    pub fn line_to_point(&mut self, p: Vec2) -> &mut Self {
        self.commands.push(PathCommand::LineTo(p));
        self
    }

    pub fn cubic_to(&mut self, ctrl1: Vec2, ctrl2: Vec2, to: Vec2) -> &mut Self {
        self.commands.push(PathCommand::CubicTo { ctrl1, ctrl2, to });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Resolves the commands into drawable segments.
    ///
    /// A `MoveTo` only relocates the pen; it never produces a segment.
    pub fn segments(&self) -> Vec<Segment> {
        let mut pen = Vec2::ZERO;
        let mut segments = Vec::with_capacity(self.commands.len());
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) => pen = p,
                PathCommand::LineTo(p) => {
                    segments.push(Segment::Line(pen, p));
                    pen = p;
                }
                PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                    segments.push(Segment::Cubic([pen, ctrl1, ctrl2, to]));
                    pen = to;
                }
            }
        }
        segments
    }

    /// True when the last drawn point lands back on the first one.
    pub fn is_closed(&self) -> bool {
        let segments = self.segments();
        match (segments.first(), segments.last()) {
            (Some(first), Some(last)) => first.start().distance(last.end()) < 1e-4,
            _ => false,
        }
    }

    pub fn length(&self) -> f32 {
        self.segments().iter().map(Segment::length).sum()
    }

    /// Point at arc-length fraction `u ∈ [0, 1]` of the whole curve.
    pub fn point_at(&self, u: f32) -> Vec2 {
        let segments = self.segments();
        let lengths: Vec<f32> = segments.iter().map(Segment::length).collect();
        self.point_at_with(&segments, &lengths, u)
    }

    fn point_at_with(&self, segments: &[Segment], lengths: &[f32], u: f32) -> Vec2 {
        let Some(last) = segments.last() else {
            return match self.commands.first() {
                Some(PathCommand::MoveTo(p)) => *p,
                _ => Vec2::ZERO,
            };
        };
        let total: f32 = lengths.iter().sum();
        let target = u.clamp(0.0, 1.0) * total;

        let mut cumulative = 0.0;
        for (segment, &length) in segments.iter().zip(lengths) {
            cumulative += length;
            if cumulative >= target {
                let diff = cumulative - target;
                let local = if length > 0.0 { 1.0 - diff / length } else { 0.0 };
                return segment.point_at(local);
            }
        }
        last.end()
    }

    /// `divisions + 1` points evenly spaced by arc length, first and last included.
    pub fn spaced_points(&self, divisions: usize) -> Vec<Vec2> {
        let divisions = divisions.max(1);
        let segments = self.segments();
        let lengths: Vec<f32> = segments.iter().map(Segment::length).collect();
        (0..=divisions)
            .map(|i| self.point_at_with(&segments, &lengths, i as f32 / divisions as f32))
            .collect()
    }

    /// Polyline approximation: lines contribute their end points, cubics
    /// `curve_segments` uniform-`t` samples. Consecutive duplicates are dropped.
    pub fn points(&self, curve_segments: usize) -> Vec<Vec2> {
        let curve_segments = curve_segments.max(1);
        let mut points: Vec<Vec2> = Vec::new();
        for segment in self.segments() {
            let resolution = match segment {
                Segment::Line(..) => 1,
                Segment::Cubic(_) => curve_segments,
            };
            for i in 0..=resolution {
                let p = segment.point(i as f32 / resolution as f32);
                if points.last().is_none_or(|last| last.distance(p) > POINT_EPSILON) {
                    points.push(p);
                }
            }
        }
        points
    }
}

// --- REVOLUTION SHAPES ---

fn a1_curve() -> ProfileCurve {
    const HEIGHT: f32 = 1.0;
    const OUTER_WIDTH: f32 = 1.0;
    const OUTER_HEIGHT: f32 = HEIGHT * 0.2;
    const VALLEY_HEIGHT: f32 = HEIGHT * 0.1;
    const INNER_WIDTH: f32 = OUTER_WIDTH * 0.3;
    const MIDDLE_WIDTH: f32 = OUTER_WIDTH * 0.6;
    const CP_HEIGHT: f32 = 0.1;

    let mut curve = ProfileCurve::new();
    curve
        .move_to(0.0, 0.0)
        .line_to(OUTER_WIDTH, 0.0)
        .line_to(OUTER_WIDTH, OUTER_HEIGHT)
        .cubic_to(
            Vec2::new(OUTER_WIDTH, OUTER_HEIGHT + VALLEY_HEIGHT),
            Vec2::new(INNER_WIDTH, OUTER_HEIGHT),
            Vec2::new(INNER_WIDTH, OUTER_HEIGHT + VALLEY_HEIGHT),
        )
        .cubic_to(
            Vec2::new(INNER_WIDTH, OUTER_HEIGHT + VALLEY_HEIGHT + CP_HEIGHT),
            Vec2::new(MIDDLE_WIDTH, OUTER_HEIGHT + VALLEY_HEIGHT),
            Vec2::new(MIDDLE_WIDTH, HEIGHT / 2.0),
        )
        .cubic_to(
            Vec2::new(MIDDLE_WIDTH, HEIGHT - (OUTER_HEIGHT + VALLEY_HEIGHT + CP_HEIGHT)),
            Vec2::new(INNER_WIDTH, HEIGHT - (OUTER_HEIGHT + VALLEY_HEIGHT + CP_HEIGHT)),
            Vec2::new(INNER_WIDTH, HEIGHT - (OUTER_HEIGHT + VALLEY_HEIGHT)),
        )
        .line_to(OUTER_WIDTH, HEIGHT)
        .line_to(0.0, HEIGHT);
    curve
}

fn a2_curve() -> ProfileCurve {
    const HEIGHT: f32 = 1.0;
    const WIDTH: f32 = 1.0;
    const MOUNT_LOWER_HEIGHT: f32 = HEIGHT * 0.15;
    const MOUNT_LOWER_CP: f32 = 0.075;
    const VALLEY_LOWER_HEIGHT: f32 = HEIGHT * 0.25;
    const VALLEY_LOWER_WIDTH: f32 = WIDTH * 0.4;
    const VALLEY_LOWER_CP: f32 = 0.2;
    const MOUNT_HIGHER_HEIGHT: f32 = HEIGHT * 0.4;
    const VALLEY_HIGHER_WIDTH: f32 = WIDTH * 0.7;
    const VALLEY_HIGHER_CP: f32 = 0.1;
    const MOUNT_HIGHER_CP1_Y: f32 =
        0.7 * MOUNT_HIGHER_HEIGHT + (MOUNT_LOWER_HEIGHT + VALLEY_LOWER_HEIGHT);
    const MOUNT_HIGHER_CP1_X: f32 = 0.2 * (WIDTH - VALLEY_LOWER_WIDTH) + VALLEY_LOWER_WIDTH;
    const MOUNT_HIGHER_TOP: f32 = MOUNT_LOWER_HEIGHT + VALLEY_LOWER_HEIGHT + MOUNT_HIGHER_HEIGHT;

    let mut curve = ProfileCurve::new();
    curve
        .move_to(0.0, 0.0)
        .cubic_to(
            Vec2::new(WIDTH - MOUNT_LOWER_CP, 0.0),
            Vec2::new(WIDTH, MOUNT_LOWER_CP),
            Vec2::new(WIDTH, MOUNT_LOWER_HEIGHT),
        )
        .cubic_to(
            Vec2::new(WIDTH, MOUNT_LOWER_HEIGHT + VALLEY_LOWER_CP),
            Vec2::new(VALLEY_LOWER_WIDTH, MOUNT_LOWER_HEIGHT + VALLEY_LOWER_HEIGHT - VALLEY_LOWER_CP),
            Vec2::new(VALLEY_LOWER_WIDTH, MOUNT_LOWER_HEIGHT + VALLEY_LOWER_HEIGHT),
        );
    // The upper mount is drawn twice; the second pass is a closed loop on the
    // mount's tip that gives the silhouette its small lip.
    for _ in 0..2 {
        curve.cubic_to(
            Vec2::new(MOUNT_HIGHER_CP1_X, MOUNT_HIGHER_CP1_Y),
            Vec2::new(WIDTH, MOUNT_HIGHER_CP1_Y),
            Vec2::new(WIDTH, MOUNT_HIGHER_TOP),
        );
    }
    curve.cubic_to(
        Vec2::new(WIDTH, HEIGHT - VALLEY_HIGHER_CP),
        Vec2::new(VALLEY_HIGHER_WIDTH, HEIGHT - VALLEY_HIGHER_CP),
        Vec2::new(VALLEY_HIGHER_WIDTH, HEIGHT),
    );
    curve
}

fn a3_curve() -> ProfileCurve {
    const HEIGHT: f32 = 1.0;
    const WIDTH: f32 = 1.0;
    const BASE_HEIGHT: f32 = HEIGHT * 0.15;
    const HANDLE_WIDTH: f32 = WIDTH * 0.2;
    const HANDLE_HEIGHT: f32 = HEIGHT * 0.1;
    const CUP_MOUNT_HEIGHT: f32 = HEIGHT * 0.2;
    const CUP_MOUNT_CP: f32 = 0.06;
    const CUP_WIDTH: f32 = WIDTH * 0.8;
    const CUP_VALLEY_HEIGHT: f32 = HEIGHT * 0.2;
    const CUP_VALLEY_WIDTH: f32 = WIDTH * 0.4;
    const CUP_VALLEY_CP: f32 = 0.15;

    let mut curve = ProfileCurve::new();
    curve
        .move_to(0.0, 0.0)
        .line_to(WIDTH, 0.0)
        .line_to(HANDLE_WIDTH, BASE_HEIGHT)
        .line_to(HANDLE_WIDTH, BASE_HEIGHT + HANDLE_HEIGHT)
        .cubic_to(
            Vec2::new(HANDLE_WIDTH, BASE_HEIGHT + HANDLE_HEIGHT + CUP_MOUNT_CP),
            Vec2::new(CUP_WIDTH, BASE_HEIGHT + HANDLE_HEIGHT + CUP_MOUNT_CP),
            Vec2::new(CUP_WIDTH, BASE_HEIGHT + HANDLE_HEIGHT + CUP_MOUNT_HEIGHT),
        )
        .line_to(CUP_WIDTH, HEIGHT - CUP_VALLEY_HEIGHT)
        .cubic_to(
            Vec2::new(CUP_WIDTH, HEIGHT),
            Vec2::new(CUP_VALLEY_WIDTH + CUP_VALLEY_CP, HEIGHT - CUP_VALLEY_HEIGHT),
            Vec2::new(CUP_VALLEY_WIDTH, HEIGHT),
        );
    curve
}

fn a4_curve() -> ProfileCurve {
    const HEIGHT: f32 = 1.0;
    const WIDTH: f32 = 1.0;
    const BASE_LOWER_WIDTH: f32 = WIDTH * 0.4;
    const BASE_UPPER_WIDTH: f32 = WIDTH * 0.6;
    const BASE_HEIGHT: f32 = WIDTH * 0.25;
    const BASE_CP_WIDTH: f32 = WIDTH * 0.9;
    const LOWER_POINTY_CP_WIDTH: f32 = WIDTH * 0.3;
    const LOWER_POINTY_HEIGHT: f32 = WIDTH * 0.35;
    const UPPER_POINTY_CP: f32 = (HEIGHT - (BASE_HEIGHT + LOWER_POINTY_HEIGHT)) * 0.25;

    let mut curve = ProfileCurve::new();
    curve
        .move_to(0.0, 0.0)
        .line_to(BASE_LOWER_WIDTH, 0.0)
        .cubic_to(
            Vec2::new(BASE_CP_WIDTH, 0.0),
            Vec2::new(BASE_CP_WIDTH, BASE_HEIGHT),
            Vec2::new(BASE_UPPER_WIDTH, BASE_HEIGHT),
        )
        .cubic_to(
            Vec2::new(LOWER_POINTY_CP_WIDTH, BASE_HEIGHT),
            Vec2::new(LOWER_POINTY_CP_WIDTH, BASE_HEIGHT + LOWER_POINTY_HEIGHT),
            Vec2::new(WIDTH, BASE_HEIGHT + LOWER_POINTY_HEIGHT),
        )
        .cubic_to(
            Vec2::new(0.0, BASE_HEIGHT + LOWER_POINTY_HEIGHT + UPPER_POINTY_CP),
            Vec2::new(WIDTH, HEIGHT - UPPER_POINTY_CP),
            Vec2::new(0.0, HEIGHT),
        );
    curve
}

// --- EXTRUSION SHAPES ---

/// Triangle: the top vertex swept around the origin in three steps.
fn b1_curve() -> ProfileCurve {
    const RADIUS: f32 = 1.0;
    const ITERATIONS: usize = 3;

    let rotation = Rot2::radians(TAU / ITERATIONS as f32);
    let mut corner = Vec2::new(0.0, RADIUS);

    let mut curve = ProfileCurve::new();
    curve.move_to(corner.x, corner.y);
    for _ in 0..ITERATIONS {
        corner = rotation * corner;
        curve.line_to_point(corner);
    }
    curve
}

/// Seven-pointed rounded star. Both control points of each arc sit on the
/// midpoint of its two corners, pulled in toward the inner radius.
fn b2_curve() -> ProfileCurve {
    const OUTER_RADIUS: f32 = 1.0;
    const INNER_RADIUS: f32 = OUTER_RADIUS * 0.6;
    const ITERATIONS: usize = 7;

    let rotation = Rot2::radians(TAU / ITERATIONS as f32);
    let mut corner = Vec2::new(0.0, OUTER_RADIUS);

    let mut curve = ProfileCurve::new();
    curve.move_to(corner.x, corner.y);
    for _ in 0..ITERATIONS {
        let next = rotation * corner;
        let control = (corner + next) * (INNER_RADIUS / 2.0);
        curve.cubic_to(control, control, next);
        corner = next;
    }
    curve
}

/// Four-armed cross with bevelled tips, one arm per quarter turn (clockwise).
fn b3_curve() -> ProfileCurve {
    const OUTER_RADIUS: f32 = 1.0;
    const INNER_RADIUS: f32 = 0.4;
    const CP_BEVEL: f32 = 0.2;
    const ITERATIONS: usize = 4;

    let rotation = Rot2::radians(-TAU / ITERATIONS as f32);
    let mut arm = [
        Vec2::new(INNER_RADIUS / 2.0, INNER_RADIUS),
        Vec2::new(INNER_RADIUS / 2.0, OUTER_RADIUS),
        Vec2::new(OUTER_RADIUS - CP_BEVEL, OUTER_RADIUS),
        Vec2::new(OUTER_RADIUS, OUTER_RADIUS - CP_BEVEL),
        Vec2::new(OUTER_RADIUS, INNER_RADIUS / 2.0),
        Vec2::new(INNER_RADIUS, INNER_RADIUS / 2.0),
    ];

    let mut curve = ProfileCurve::new();
    curve.move_to(-INNER_RADIUS / 2.0, INNER_RADIUS);
    for _ in 0..ITERATIONS {
        curve
            .line_to_point(arm[0])
            .line_to_point(arm[1])
            .cubic_to(arm[2], arm[3], arm[4])
            .line_to_point(arm[5]);
        for p in &mut arm {
            *p = rotation * *p;
        }
    }
    curve
}

/// Rounded capsule, taller than wide.
fn b4_curve() -> ProfileCurve {
    const RADIUS_X: f32 = 0.4;
    const RADIUS_Y: f32 = 1.0;
    const CP_BEVEL: f32 = RADIUS_X * 0.45;

    let mut curve = ProfileCurve::new();
    curve
        .move_to(0.0, RADIUS_Y)
        .cubic_to(
            Vec2::new(RADIUS_X - CP_BEVEL, RADIUS_Y),
            Vec2::new(RADIUS_X, RADIUS_Y - CP_BEVEL),
            Vec2::new(RADIUS_X, RADIUS_Y - RADIUS_X),
        )
        .line_to(RADIUS_X, -(RADIUS_Y - RADIUS_X))
        .cubic_to(
            Vec2::new(RADIUS_X, -(RADIUS_Y - CP_BEVEL)),
            Vec2::new(RADIUS_X - CP_BEVEL, -RADIUS_Y),
            Vec2::new(0.0, -RADIUS_Y),
        )
        .cubic_to(
            Vec2::new(-(RADIUS_X - CP_BEVEL), -RADIUS_Y),
            Vec2::new(-RADIUS_X, -(RADIUS_Y - CP_BEVEL)),
            Vec2::new(-RADIUS_X, -(RADIUS_Y - RADIUS_X)),
        )
        .line_to(-RADIUS_X, RADIUS_Y - RADIUS_X)
        .cubic_to(
            Vec2::new(-RADIUS_X, RADIUS_Y - CP_BEVEL),
            Vec2::new(-(RADIUS_X - CP_BEVEL), RADIUS_Y),
            Vec2::new(0.0, RADIUS_Y),
        );
    curve
}
