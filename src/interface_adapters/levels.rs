// Level file adapter: JSON level definitions into domain templates.

use crate::domain::tuning::WorldTuning;
use crate::domain::{
    Axis, CircularMotion, HazardKind, HazardTemplate, LevelTemplate, LinearMotion, Motion,
    PathMotion, PlatformTemplate, PortalTemplate, Rect, Vec2,
};
use serde::Deserialize;
use std::{fmt, io, path::Path};

const BUILTIN_LEVELS: &str = include_str!("../../levels/default.json");

#[derive(Debug)]
pub enum LevelLoadError {
    Io(io::Error),
    Parse(serde_json::Error),
    /// `level` is 1-based.
    Invalid { level: usize, reason: String },
}

impl fmt::Display for LevelLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelLoadError::Io(e) => write!(f, "failed to read levels: {e}"),
            LevelLoadError::Parse(e) => write!(f, "failed to parse levels: {e}"),
            LevelLoadError::Invalid { level, reason } => write!(f, "level {level}: {reason}"),
        }
    }
}

impl std::error::Error for LevelLoadError {}

impl From<io::Error> for LevelLoadError {
    fn from(e: io::Error) -> Self {
        LevelLoadError::Io(e)
    }
}

impl From<serde_json::Error> for LevelLoadError {
    fn from(e: serde_json::Error) -> Self {
        LevelLoadError::Parse(e)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LevelDto {
    #[serde(default)]
    platforms: Vec<BodyDto>,
    #[serde(default)]
    obstacles: Vec<BodyDto>,
    #[serde(default)]
    bombs: Vec<BodyDto>,
    portal: PortalDto,
    #[serde(default)]
    spawn: Option<Vec2>,
    #[serde(default)]
    tutorial_text: Vec<String>,
}

/// One platform or hazard. Motion fields are optional and selected by `type` / `moveType`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BodyDto {
    x: f32,
    y: f32,
    width: f32,
    #[serde(default)]
    height: Option<f32>,
    #[serde(default, rename = "type")]
    kind: Option<String>,

    // Linear.
    #[serde(default)]
    move_type: Option<Axis>,
    #[serde(default)]
    move_min: Option<f32>,
    #[serde(default)]
    move_max: Option<f32>,
    #[serde(default)]
    move_speed: Option<f32>,
    #[serde(default)]
    move_direction: Option<f32>,

    // Circular.
    #[serde(default)]
    center: Option<Vec2>,
    #[serde(default)]
    radius: Option<f32>,
    #[serde(default)]
    angle: Option<f32>,

    // Path.
    #[serde(default)]
    points: Option<Vec<Vec2>>,
    #[serde(default)]
    current_point: Option<usize>,
    #[serde(default)]
    next_point: Option<usize>,

    // Circular (radians per tick) or path (distance per tick).
    #[serde(default)]
    speed: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PortalDto {
    x: f32,
    y: f32,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    width: Option<f32>,
    #[serde(default)]
    height: Option<f32>,
}

/// Parses a JSON array of levels.
pub fn parse_levels(json: &str, world: &WorldTuning) -> Result<Vec<LevelTemplate>, LevelLoadError> {
    let dtos: Vec<LevelDto> = serde_json::from_str(json)?;
    if dtos.is_empty() {
        return Err(LevelLoadError::Invalid {
            level: 0,
            reason: "no levels defined".to_string(),
        });
    }
    dtos.into_iter()
        .enumerate()
        .map(|(index, dto)| convert_level(dto, world).map_err(|reason| invalid(index + 1, reason)))
        .collect()
}

pub fn load_levels(path: &Path, world: &WorldTuning) -> Result<Vec<LevelTemplate>, LevelLoadError> {
    let json = std::fs::read_to_string(path)?;
    parse_levels(&json, world)
}

/// The levels shipped with the crate.
pub fn builtin_levels(world: &WorldTuning) -> Result<Vec<LevelTemplate>, LevelLoadError> {
    parse_levels(BUILTIN_LEVELS, world)
}

fn invalid(level: usize, reason: String) -> LevelLoadError {
    LevelLoadError::Invalid { level, reason }
}

fn convert_level(dto: LevelDto, world: &WorldTuning) -> Result<LevelTemplate, String> {
    let platforms = dto
        .platforms
        .iter()
        .enumerate()
        .map(|(i, body)| {
            Ok(PlatformTemplate {
                rect: body_rect(body, world.platform_height).map_err(|e| format!("platform {i}: {e}"))?,
                motion: body_motion(body).map_err(|e| format!("platform {i}: {e}"))?,
            })
        })
        .collect::<Result<Vec<_>, String>>()?;

    let hazards = hazards(&dto.obstacles, HazardKind::Obstacle, "obstacle")?
        .into_iter()
        .chain(hazards(&dto.bombs, HazardKind::Bomb, "bomb")?)
        .collect();

    let spawn = dto.spawn.unwrap_or(world.spawn);
    if !spawn.is_finite() {
        return Err("spawn must be finite".to_string());
    }

    Ok(LevelTemplate {
        platforms,
        hazards,
        portal: portal(&dto.portal, world)?,
        spawn,
        tutorial_text: dto.tutorial_text,
    })
}

fn hazards(bodies: &[BodyDto], kind: HazardKind, name: &str) -> Result<Vec<HazardTemplate>, String> {
    bodies
        .iter()
        .enumerate()
        .map(|(i, body)| {
            // Hazards without a height are square.
            Ok(HazardTemplate {
                rect: body_rect(body, body.width).map_err(|e| format!("{name} {i}: {e}"))?,
                kind,
                motion: body_motion(body).map_err(|e| format!("{name} {i}: {e}"))?,
            })
        })
        .collect()
}

fn body_rect(body: &BodyDto, default_height: f32) -> Result<Rect, String> {
    let rect = Rect::new(
        body.x,
        body.y,
        body.width,
        body.height.unwrap_or(default_height),
    );
    if rect.is_valid() {
        Ok(rect)
    } else {
        Err("size must be positive and finite".to_string())
    }
}

fn body_motion(body: &BodyDto) -> Result<Motion, String> {
    match body.kind.as_deref() {
        Some("circular") => circular(body).map(Motion::Circular),
        Some("path") => path(body).map(Motion::Path),
        Some(other) => Err(format!("unknown motion type {other:?}")),
        None => match body.move_type {
            Some(axis) => linear(body, axis).map(Motion::Linear),
            None => Ok(Motion::Static),
        },
    }
}

fn linear(body: &BodyDto, axis: Axis) -> Result<LinearMotion, String> {
    let (Some(min), Some(max)) = (body.move_min, body.move_max) else {
        return Err("linear motion needs moveMin and moveMax".to_string());
    };
    let raw_speed = body.move_speed.unwrap_or(0.0);
    let raw_direction = body.move_direction.unwrap_or(1.0);
    if ![min, max, raw_speed, raw_direction].iter().all(|v| v.is_finite()) {
        return Err("linear motion values must be finite".to_string());
    }
    if min > max {
        return Err(format!("moveMin {min} exceeds moveMax {max}"));
    }

    // Older levels encode direction in the speed sign.
    let mut direction = if raw_direction < 0.0 { -1.0 } else { 1.0 };
    if raw_speed < 0.0 {
        direction = -direction;
    }

    Ok(LinearMotion {
        axis,
        min,
        max,
        speed: raw_speed.abs(),
        direction,
    })
}

fn circular(body: &BodyDto) -> Result<CircularMotion, String> {
    let (Some(center), Some(radius)) = (body.center, body.radius) else {
        return Err("circular motion needs center and radius".to_string());
    };
    let angle = body.angle.unwrap_or(0.0);
    let angular_speed = body.speed.unwrap_or(0.0);
    if !center.is_finite() || ![radius, angle, angular_speed].iter().all(|v| v.is_finite()) {
        return Err("circular motion values must be finite".to_string());
    }
    if radius < 0.0 {
        return Err("radius must not be negative".to_string());
    }
    Ok(CircularMotion {
        center,
        radius,
        angle: angle.rem_euclid(std::f32::consts::TAU),
        angular_speed,
    })
}

fn path(body: &BodyDto) -> Result<PathMotion, String> {
    let waypoints = body.points.clone().unwrap_or_default();
    if waypoints.is_empty() {
        return Err("path motion needs at least one point".to_string());
    }
    if !waypoints.iter().all(|p| p.is_finite()) {
        return Err("path points must be finite".to_string());
    }
    let current = body.current_point.unwrap_or(0);
    let next = body.next_point.unwrap_or((current + 1) % waypoints.len());
    if current >= waypoints.len() || next >= waypoints.len() {
        return Err("path point index out of range".to_string());
    }
    let speed = body.speed.unwrap_or(0.0);
    if !speed.is_finite() || speed < 0.0 {
        return Err("path speed must be finite and non-negative".to_string());
    }
    Ok(PathMotion {
        waypoints,
        current,
        next,
        speed,
    })
}

fn portal(dto: &PortalDto, world: &WorldTuning) -> Result<PortalTemplate, String> {
    if !dto.x.is_finite() || !dto.y.is_finite() {
        return Err("portal position must be finite".to_string());
    }
    match dto.kind.as_deref() {
        None | Some("ring") => Ok(PortalTemplate::Ring {
            center: Vec2::new(dto.x, dto.y),
        }),
        Some("finishLine") => {
            let rect = Rect::new(
                dto.x,
                dto.y,
                dto.width.unwrap_or(world.finish_line_width),
                dto.height.unwrap_or(world.finish_line_height),
            );
            if !rect.is_valid() {
                return Err("finish line size must be positive and finite".to_string());
            }
            Ok(PortalTemplate::FinishLine { rect })
        }
        Some(other) => Err(format!("unknown portal type {other:?}")),
    }
}
