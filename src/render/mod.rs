//! Terminal presentation surface
//!
//! All terminal I/O lives here. Each function receives a mutable writer and
//! an immutable view of the session; no game logic is performed. World
//! coordinates are pixels; one terminal cell covers an 8x16 pixel block so
//! glyph aspect roughly matches the square play field.
//!
//! HUD values arrive pre-formatted in a [`HudModel`] that the driver
//! recomputes only when a state-changing event fired, not every frame.

use std::io::Write;

use crossterm::{
    QueueableCommand, cursor,
    style::{self, Color, Print},
    terminal,
};
use glam::Vec2;

use crate::Settings;
use crate::sim::state::BOSS_COLOR;
use crate::sim::{Boss, EnemyKind, GamePhase, SessionState, Viewport};

/// Pixels covered by one terminal cell
pub const CELL_W: f32 = 8.0;
pub const CELL_H: f32 = 16.0;

const C_HUD: Color = Color::Yellow;
const C_LIVES: Color = Color::Red;
const C_BOMBS: Color = Color::DarkYellow;
const C_PLAYER: Color = Color::Cyan;
const C_BULLET: Color = Color::Cyan;
const C_STAR: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;

/// Logical play-field size for a terminal of `cols` x `rows` cells
/// (the top HUD row is excluded from the field)
pub fn viewport_for(cols: u16, rows: u16) -> Viewport {
    Viewport::new(cols as f32 * CELL_W, rows.saturating_sub(1) as f32 * CELL_H)
}

/// HUD values, recomputed by the driver on state-changing events
#[derive(Debug, Clone, Default)]
pub struct HudModel {
    pub score: u64,
    pub high: u64,
    pub level: u32,
    pub lives: u32,
    pub bombs: u32,
    pub combo: u32,
}

impl HudModel {
    pub fn from_state(state: &SessionState, high: u64) -> Self {
        Self {
            score: state.display_score(),
            high: high.max(state.display_score()),
            level: state.level,
            lives: state.lives,
            bombs: state.bombs,
            combo: state.combo,
        }
    }
}

fn rgb(color: u32) -> Color {
    Color::Rgb {
        r: (color >> 16) as u8,
        g: (color >> 8) as u8,
        b: color as u8,
    }
}

/// Render one complete frame
pub fn render<W: Write>(
    out: &mut W,
    state: &SessionState,
    settings: &Settings,
    hud: &HudModel,
    frame: u64,
    fps: u32,
    new_high: bool,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    // Whole-field shake offset while the timer runs
    let shake = state.screen_shake > 0.0 && settings.effective_screen_shake();
    let ox: i32 = if shake {
        if frame % 2 == 0 { 1 } else { -1 }
    } else {
        0
    };

    let grid = Grid::for_state(state, ox);

    for star in &state.stars {
        let glyph = if star.brightness > 0.5 { '✦' } else { '·' };
        grid.put(out, star.pos, C_STAR, glyph)?;
    }
    for p in &state.particles {
        let glyph = if p.alpha() > 0.5 { '•' } else { '.' };
        grid.put(out, p.pos, rgb(p.color), glyph)?;
    }
    for pu in &state.power_ups {
        grid.put(out, pu.pos, rgb(pu.kind.color()), pu.kind.symbol())?;
    }
    for bullet in &state.bullets {
        grid.put(out, bullet.pos, C_BULLET, '│')?;
    }
    for bullet in &state.enemy_bullets {
        grid.put(out, bullet.pos, rgb(bullet.color), '●')?;
    }
    for enemy in &state.enemies {
        let glyph = match enemy.kind {
            EnemyKind::Basic => '◆',
            EnemyKind::Fast => '▼',
            EnemyKind::Tank => '█',
            EnemyKind::Sine => '◈',
            EnemyKind::Zigzag => '◇',
        };
        grid.put(out, enemy.pos, rgb(enemy.color()), glyph)?;
    }
    if let Some(boss) = &state.boss {
        draw_boss(out, &grid, boss)?;
    }
    draw_player(out, &grid, state, frame)?;

    draw_hud(out, hud, settings, fps)?;
    if state.is_boss_active() {
        draw_boss_bar(out, state)?;
    }

    match state.phase {
        GamePhase::Paused => draw_center_banner(out, state, "║ PAUSED - press P to resume ║")?,
        GamePhase::GameOver => draw_game_over(out, state, hud, new_high)?,
        GamePhase::Playing => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, 0))?;
    out.flush()?;
    Ok(())
}

/// World-to-cell mapping plus bounds clipping
struct Grid {
    cols: i32,
    rows: i32,
    ox: i32,
}

impl Grid {
    fn for_state(state: &SessionState, ox: i32) -> Self {
        Self {
            cols: (state.view.width / CELL_W) as i32,
            rows: (state.view.height / CELL_H) as i32 + 1,
            ox,
        }
    }

    fn cell(&self, pos: Vec2) -> (i32, i32) {
        // Row 0 is the HUD; the field starts one row down
        (
            (pos.x / CELL_W) as i32 + self.ox,
            (pos.y / CELL_H) as i32 + 1,
        )
    }

    fn put<W: Write>(
        &self,
        out: &mut W,
        pos: Vec2,
        color: Color,
        glyph: char,
    ) -> std::io::Result<()> {
        let (x, y) = self.cell(pos);
        if x < 0 || y < 1 || x >= self.cols || y >= self.rows {
            return Ok(());
        }
        out.queue(cursor::MoveTo(x as u16, y as u16))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph))?;
        Ok(())
    }
}

fn draw_player<W: Write>(
    out: &mut W,
    grid: &Grid,
    state: &SessionState,
    frame: u64,
) -> std::io::Result<()> {
    // Blink while invincible
    if state.player.invincible && frame % 4 < 2 {
        return Ok(());
    }
    let color = if state.auto_fire {
        // Engine runs hot while the fist is closed
        Color::Rgb {
            r: 0xff,
            g: 0x66,
            b: 0x00,
        }
    } else {
        C_PLAYER
    };
    grid.put(out, state.player.pos, color, '▲')?;
    grid.put(out, state.player.pos + Vec2::new(0.0, CELL_H), color, '█')
}

fn draw_boss<W: Write>(out: &mut W, grid: &Grid, boss: &Boss) -> std::io::Result<()> {
    let color = rgb(BOSS_COLOR);
    grid.put(out, boss.pos + Vec2::new(-CELL_W, 0.0), color, '▓')?;
    grid.put(out, boss.pos, color, '◉')?;
    grid.put(out, boss.pos + Vec2::new(CELL_W, 0.0), color, '▓')
}

fn draw_hud<W: Write>(
    out: &mut W,
    hud: &HudModel,
    settings: &Settings,
    fps: u32,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;

    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!(
        "Score:{:>8}  Hi:{:>8}  Lv:{:>2} ",
        hud.score, hud.high, hud.level
    )))?;

    out.queue(style::SetForegroundColor(C_LIVES))?;
    out.queue(Print(format!("{} ", "♥".repeat(hud.lives as usize))))?;
    out.queue(style::SetForegroundColor(C_BOMBS))?;
    out.queue(Print(format!("{} ", "●".repeat(hud.bombs as usize))))?;

    // Combo readout only once it is worth bragging about
    if hud.combo >= 3 {
        out.queue(style::SetForegroundColor(Color::Magenta))?;
        out.queue(Print(format!(" COMBO x{}", hud.combo)))?;
    }

    if settings.show_fps {
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(format!(" {fps}fps")))?;
    }
    Ok(())
}

fn draw_boss_bar<W: Write>(out: &mut W, state: &SessionState) -> std::io::Result<()> {
    let Some(boss) = &state.boss else {
        return Ok(());
    };
    let cols = (state.view.width / CELL_W) as usize;
    let bar_width = (cols / 2).max(10);
    let filled = ((boss.health.max(0) as f32 / boss.max_health as f32) * bar_width as f32) as usize;
    let filled = filled.min(bar_width);

    let x = cols.saturating_sub(bar_width + 7) / 2;
    out.queue(cursor::MoveTo(x as u16, 1))?;
    out.queue(style::SetForegroundColor(rgb(BOSS_COLOR)))?;
    out.queue(Print(format!(
        "BOSS [{}{}]",
        "█".repeat(filled),
        "░".repeat(bar_width - filled)
    )))?;
    Ok(())
}

fn draw_center_banner<W: Write>(
    out: &mut W,
    state: &SessionState,
    text: &str,
) -> std::io::Result<()> {
    let cols = (state.view.width / CELL_W) as u16;
    let rows = (state.view.height / CELL_H) as u16;
    let x = cols.saturating_sub(text.chars().count() as u16) / 2;
    out.queue(cursor::MoveTo(x, rows / 2))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &SessionState,
    hud: &HudModel,
    new_high: bool,
) -> std::io::Result<()> {
    let cols = (state.view.width / CELL_W) as u16;
    let rows = (state.view.height / CELL_H) as u16;
    let cx = cols / 2;
    let cy = (rows / 2).saturating_sub(4);

    let lines = [
        "╔══════ GAME OVER ══════╗".to_string(),
        format!("  Score      {:>10}", state.display_score()),
        format!("  Level      {:>10}", state.level),
        format!("  Enemies    {:>10}", state.enemies_killed),
        format!("  Bosses     {:>10}", state.bosses_killed),
        format!("  Max combo  {:>10}", state.max_combo),
        format!("  Accuracy   {:>9}%", state.accuracy()),
        format!("  Best       {:>10}", hud.high),
        "╚═══ R restart · Q quit ═══╝".to_string(),
    ];

    for (i, line) in lines.iter().enumerate() {
        let x = cx.saturating_sub(line.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(x, cy + i as u16))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print(line))?;
    }

    if new_high {
        let text = "★ NEW HIGH SCORE! ★";
        let x = cx.saturating_sub(text.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(x, cy + lines.len() as u16 + 1))?;
        out.queue(style::SetForegroundColor(C_HUD))?;
        out.queue(Print(text))?;
    }
    Ok(())
}
