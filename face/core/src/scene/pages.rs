//! Drawing for the non-face pages
//!
//! Every shape key is prefixed with its page name, so a retained backend
//! never confuses one page's widgets with another's.

use crate::color::{self, Rgb};
use crate::pages::{
    CalendarState, ClockState, Page, ParticleKind, ParticleSystemState, PixelGridState,
    SubwayState, TextState, TimerState, WeatherIcon, WeatherState, PIXEL_GRID_COLS,
    PIXEL_GRID_ROWS,
};
use crate::render::{Frame, Shape, TextAlign};

use super::FaceLayout;

/// Rough glyph advance relative to glyph height
const GLYPH_ASPECT: f32 = 0.6;

/// Compose any page other than the face (which yields an empty frame)
#[must_use]
pub fn compose_page(page: &Page, layout: &FaceLayout) -> Frame {
    match page {
        Page::Face => Frame::new(color::BACKGROUND),
        Page::Text(text) => text_frame(text, layout),
        Page::PixelArt(grid) => pixel_frame(grid, layout),
        Page::Weather(weather) => weather_frame(weather, layout),
        Page::Clock(clock) => clock_frame(clock, layout),
        Page::Timer(timer) => timer_frame(timer, layout),
        Page::Subway(subway) => subway_frame(subway, layout),
        Page::Calendar(calendar) => calendar_frame(calendar, layout),
        Page::Animation(system) => particle_frame(system),
    }
}

fn text(
    x: f32,
    y: f32,
    content: impl Into<String>,
    size: f32,
    color: Rgb,
    align: TextAlign,
) -> Shape {
    Shape::Text {
        x,
        y,
        content: content.into(),
        size,
        color,
        align,
    }
}

/// Greedy word wrap to at most `max_chars` per line
fn wrap(content: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    for paragraph in content.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if line.is_empty() {
                word.chars().count()
            } else {
                line.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

fn text_frame(state: &TextState, layout: &FaceLayout) -> Frame {
    let mut frame = Frame::new(state.background);
    let size = state.size.pixel_height(layout.height as u16);
    let usable = layout.width - 24.0;
    let max_chars = (usable / (size * GLYPH_ASPECT)).floor() as usize;
    let lines = wrap(&state.content, max_chars);

    let line_height = size * 1.2;
    let max_lines = ((layout.height / line_height).floor() as usize).max(1);
    let shown = lines.len().min(max_lines);
    let top = layout.height / 2.0 - (shown as f32 - 1.0) * line_height / 2.0;

    for (i, line) in lines.into_iter().take(shown).enumerate() {
        frame.push(
            format!("text.line.{i}"),
            text(
                layout.width / 2.0,
                top + i as f32 * line_height,
                line,
                size,
                state.color,
                TextAlign::Center,
            ),
        );
    }
    frame
}

fn pixel_frame(grid: &PixelGridState, layout: &FaceLayout) -> Frame {
    let mut frame = Frame::new(grid.background);
    let cell = (layout.width / PIXEL_GRID_COLS as f32)
        .min(layout.height / PIXEL_GRID_ROWS as f32)
        .floor();
    let left = (layout.width - cell * PIXEL_GRID_COLS as f32) / 2.0;
    let top = (layout.height - cell * PIXEL_GRID_ROWS as f32) / 2.0;

    for y in 0..PIXEL_GRID_ROWS {
        for x in 0..PIXEL_GRID_COLS {
            if let Some(color) = grid.cell(x, y) {
                frame.push(
                    format!("pixel.{x}.{y}"),
                    Shape::RoundedRect {
                        x: left + x as f32 * cell,
                        y: top + y as f32 * cell,
                        width: cell,
                        height: cell,
                        radius: 0.0,
                        color,
                    },
                );
            }
        }
    }
    frame
}

fn weather_frame(state: &WeatherState, layout: &FaceLayout) -> Frame {
    let mut frame = Frame::new(color::BACKGROUND);
    let cx = layout.width / 2.0;
    let icon_y = layout.height * 0.3;
    let r = layout.height * 0.1;

    let sun = |frame: &mut Frame, x: f32, y: f32, radius: f32| {
        frame.push(
            "weather.sun",
            Shape::Circle {
                cx: x,
                cy: y,
                radius,
                color: color::WEATHER_ACCENT,
            },
        );
    };
    let cloud = |frame: &mut Frame, x: f32, y: f32, tint: Rgb| {
        for (i, (dx, dy, scale)) in [(-0.8, 0.2, 0.7), (0.0, -0.1, 1.0), (0.8, 0.2, 0.7)]
            .into_iter()
            .enumerate()
        {
            frame.push(
                format!("weather.cloud.{i}"),
                Shape::Circle {
                    cx: x + dx * r,
                    cy: y + dy * r,
                    radius: r * scale,
                    color: tint,
                },
            );
        }
    };

    match state.icon {
        WeatherIcon::Sunny => sun(&mut frame, cx, icon_y, r),
        WeatherIcon::Cloudy => cloud(&mut frame, cx, icon_y, Rgb::WHITE),
        WeatherIcon::PartlyCloudy => {
            sun(&mut frame, cx - r * 0.6, icon_y - r * 0.5, r * 0.8);
            cloud(&mut frame, cx + r * 0.3, icon_y + r * 0.2, Rgb::WHITE);
        }
        WeatherIcon::Rainy | WeatherIcon::Snowy => {
            cloud(&mut frame, cx, icon_y - r * 0.3, Rgb::WHITE);
            let drop = if state.icon == WeatherIcon::Rainy {
                color::RAIN
            } else {
                Rgb::WHITE
            };
            for i in 0..3 {
                let x = cx + (i as f32 - 1.0) * r * 0.8;
                frame.push(
                    format!("weather.drop.{i}"),
                    Shape::Circle {
                        cx: x,
                        cy: icon_y + r * 1.1,
                        radius: r * 0.15,
                        color: drop,
                    },
                );
            }
        }
        WeatherIcon::Stormy => {
            cloud(&mut frame, cx, icon_y - r * 0.3, color::TEXT_DIM);
            frame.push(
                "weather.bolt",
                Shape::Line {
                    x1: cx + r * 0.2,
                    y1: icon_y + r * 0.4,
                    x2: cx - r * 0.2,
                    y2: icon_y + r * 1.3,
                    width: r * 0.15,
                    color: color::WEATHER_ACCENT,
                },
            );
        }
        WeatherIcon::Foggy => {
            for i in 0..3 {
                let y = icon_y + (i as f32 - 1.0) * r * 0.6;
                frame.push(
                    format!("weather.fog.{i}"),
                    Shape::Line {
                        x1: cx - r * 1.2,
                        y1: y,
                        x2: cx + r * 1.2,
                        y2: y,
                        width: r * 0.2,
                        color: color::TEXT_DIM,
                    },
                );
            }
        }
    }

    frame.push(
        "weather.temp",
        text(
            cx,
            layout.height * 0.62,
            &*state.temp_label,
            layout.height * 0.2,
            color::TEXT_DEFAULT,
            TextAlign::Center,
        ),
    );
    frame.push(
        "weather.desc",
        text(
            cx,
            layout.height * 0.82,
            &*state.description,
            layout.height * 0.08,
            color::TEXT_DIM,
            TextAlign::Center,
        ),
    );
    frame
}

fn clock_frame(state: &ClockState, layout: &FaceLayout) -> Frame {
    let mut frame = Frame::new(color::BACKGROUND);
    let cx = layout.width / 2.0;
    let (time, suffix) = state.time_label();

    frame.push(
        "clock.time",
        text(
            cx,
            layout.height * 0.45,
            time,
            layout.height * 0.3,
            color::TEXT_DEFAULT,
            TextAlign::Center,
        ),
    );
    if let Some(suffix) = suffix {
        frame.push(
            "clock.ampm",
            text(
                cx,
                layout.height * 0.66,
                suffix,
                layout.height * 0.08,
                color::TEXT_DIM,
                TextAlign::Center,
            ),
        );
    }
    if !state.date_label.is_empty() {
        frame.push(
            "clock.date",
            text(
                cx,
                layout.height * 0.82,
                &*state.date_label,
                layout.height * 0.08,
                color::TEXT_DIM,
                TextAlign::Center,
            ),
        );
    }
    frame
}

fn timer_frame(state: &TimerState, layout: &FaceLayout) -> Frame {
    let mut frame = Frame::new(color::BACKGROUND);
    let cx = layout.width / 2.0;
    let cy = layout.height / 2.0;
    let radius = layout.height * 0.4;
    let stroke = layout.height * 0.04;
    let ring = if state.running {
        color::TIMER_RUNNING
    } else {
        color::TIMER_PAUSED
    };

    frame.push(
        "timer.track",
        Shape::Arc {
            cx,
            cy,
            radius,
            start_deg: 0.0,
            end_deg: 360.0,
            width: stroke,
            color: color::TIMER_TRACK,
        },
    );
    let sweep = 360.0 * state.remaining_fraction();
    if sweep > 0.0 {
        frame.push(
            "timer.arc",
            Shape::Arc {
                cx,
                cy,
                radius,
                start_deg: 270.0,
                end_deg: 270.0 + sweep,
                width: stroke,
                color: ring,
            },
        );
    }
    frame.push(
        "timer.time",
        text(
            cx,
            cy,
            state.label_text(),
            layout.height * 0.22,
            color::TEXT_DEFAULT,
            TextAlign::Center,
        ),
    );
    if !state.label.is_empty() {
        frame.push(
            "timer.label",
            text(
                cx,
                cy + layout.height * 0.17,
                &*state.label,
                layout.height * 0.07,
                color::TEXT_DIM,
                TextAlign::Center,
            ),
        );
    }
    frame
}

fn subway_frame(state: &SubwayState, layout: &FaceLayout) -> Frame {
    let mut frame = Frame::new(color::BACKGROUND);
    let bullet_r = layout.height * 0.1;
    let bullet_x = layout.width * 0.15;
    let bullet_y = layout.height * 0.2;
    let text_x = bullet_x + bullet_r * 1.5;

    frame.push(
        "subway.bullet",
        Shape::Circle {
            cx: bullet_x,
            cy: bullet_y,
            radius: bullet_r,
            color: state.line_color,
        },
    );
    frame.push(
        "subway.line",
        text(bullet_x, bullet_y, &*state.line_id, bullet_r * 1.3, Rgb::WHITE, TextAlign::Center),
    );
    frame.push(
        "subway.station",
        text(
            text_x,
            bullet_y - bullet_r * 0.4,
            &*state.station,
            layout.height * 0.08,
            color::TEXT_DEFAULT,
            TextAlign::Left,
        ),
    );
    frame.push(
        "subway.direction",
        text(
            text_x,
            bullet_y + bullet_r * 0.5,
            &*state.direction,
            layout.height * 0.06,
            color::TEXT_DIM,
            TextAlign::Left,
        ),
    );

    if state.arrivals_minutes.is_empty() {
        frame.push(
            "subway.none",
            text(
                layout.width / 2.0,
                layout.height * 0.6,
                "No trains",
                layout.height * 0.08,
                color::TEXT_DIM,
                TextAlign::Center,
            ),
        );
    }
    let slot = layout.width / 3.0;
    for (i, minutes) in state.arrivals_minutes.iter().enumerate() {
        let x = slot * (i as f32 + 0.5);
        let label = if *minutes == 0 {
            "now".to_string()
        } else {
            minutes.to_string()
        };
        let size = if i == 0 { layout.height * 0.22 } else { layout.height * 0.15 };
        frame.push(
            format!("subway.time.{i}"),
            text(x, layout.height * 0.6, label, size, color::TEXT_DEFAULT, TextAlign::Center),
        );
        frame.push(
            format!("subway.unit.{i}"),
            text(
                x,
                layout.height * 0.78,
                "min",
                layout.height * 0.06,
                color::TEXT_DIM,
                TextAlign::Center,
            ),
        );
    }
    frame
}

fn calendar_frame(state: &CalendarState, layout: &FaceLayout) -> Frame {
    let mut frame = Frame::new(color::BACKGROUND);
    if state.events.is_empty() {
        frame.push(
            "calendar.empty",
            text(
                layout.width / 2.0,
                layout.height / 2.0,
                "No events",
                layout.height * 0.08,
                color::TEXT_DIM,
                TextAlign::Center,
            ),
        );
        return frame;
    }

    let margin = layout.width * 0.05;
    let card_h = (layout.height - margin * 4.0) / 3.0;
    let card_w = layout.width - margin * 2.0;
    for (i, event) in state.events.iter().enumerate() {
        let top = margin + i as f32 * (card_h + margin);
        let text_x = margin * 2.0 + card_w * 0.02;
        frame.push(
            format!("calendar.card.{i}"),
            Shape::RoundedRect {
                x: margin,
                y: top,
                width: card_w,
                height: card_h,
                radius: card_h * 0.15,
                color: color::TIMER_TRACK,
            },
        );
        frame.push(
            format!("calendar.accent.{i}"),
            Shape::RoundedRect {
                x: margin,
                y: top,
                width: card_w * 0.02,
                height: card_h,
                radius: 0.0,
                color: color::CALENDAR_ACCENT,
            },
        );
        frame.push(
            format!("calendar.time.{i}"),
            text(
                text_x,
                top + card_h * 0.25,
                &*event.time_label,
                card_h * 0.22,
                color::CALENDAR_ACCENT,
                TextAlign::Left,
            ),
        );
        frame.push(
            format!("calendar.title.{i}"),
            text(
                text_x,
                top + card_h * 0.55,
                &*event.title,
                card_h * 0.28,
                color::TEXT_DEFAULT,
                TextAlign::Left,
            ),
        );
        if !event.location.is_empty() {
            frame.push(
                format!("calendar.location.{i}"),
                text(
                    text_x,
                    top + card_h * 0.82,
                    &*event.location,
                    card_h * 0.18,
                    color::TEXT_DIM,
                    TextAlign::Left,
                ),
            );
        }
    }
    frame
}

fn particle_frame(system: &ParticleSystemState) -> Frame {
    let background = match system.kind {
        ParticleKind::Matrix | ParticleKind::Stars => Rgb::BLACK,
        _ => color::BACKGROUND,
    };
    let mut frame = Frame::new(background);
    for (i, p) in system.particles.iter().enumerate() {
        let key = format!("particle.{i}");
        let shape = match system.kind {
            ParticleKind::Rain => Shape::Line {
                x1: p.x,
                y1: p.y,
                x2: p.x,
                y2: p.y + p.size,
                width: 2.0,
                color: color::RAIN,
            },
            ParticleKind::Snow => Shape::Circle {
                cx: p.x,
                cy: p.y,
                radius: p.size,
                color: Rgb::WHITE,
            },
            ParticleKind::Stars => Shape::Circle {
                cx: p.x,
                cy: p.y,
                radius: p.size,
                color: Rgb::WHITE.scaled(system.opacity(p)),
            },
            ParticleKind::Matrix => Shape::Line {
                x1: p.x,
                y1: p.y - p.size,
                x2: p.x,
                y2: p.y,
                width: 6.0,
                color: color::MATRIX,
            },
        };
        frame.push(key, shape);
    }
    frame
}
