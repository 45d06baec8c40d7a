/// Per-phase scene composition.
///
/// Each `compose_*` function reads game state and issues draw calls in
/// logical playfield pixels. Nothing here knows about terminals; the same
/// scene drives the terminal canvas and the recording canvas in tests.

use crate::domain::character::{Character, Rgb};
use crate::domain::physics::{Point, Rect};
use crate::domain::rules::{PromptButton, TIMER_WARNING_SECS};
use crate::sim::game::{GameLoop, Phase};
use crate::sim::result::ResultController;
use crate::sim::selection::SelectionScreen;
use crate::sim::session::RoundSnapshot;
use super::asset::{Asset, AssetProvider};
use super::canvas::{Canvas, FontTier, RectStyle};

const CARD_RADIUS: f32 = 15.0;
const PLAYER_RADIUS: f32 = 8.0;
const BUTTON_RADIUS: f32 = 10.0;
const COIN_RING: u32 = 2;
const CURSOR_BORDER: u32 = 5;
const CARD_BORDER: u32 = 1;

const TITLE: &str = "Choose Your Hero";
const HINT: &str = "Use Arrow Keys, Press Enter to Start";
const ASK: &str = "Play again?";
const RETRY_LABEL: &str = "Again";
const QUIT_LABEL: &str = "Quit";

pub fn compose<C: Canvas>(canvas: &mut C, game: &GameLoop, assets: &mut AssetProvider) {
    let width = game.field().width;
    match game.phase() {
        Phase::Selection => {
            if let Some(screen) = game.selection() {
                compose_selection(canvas, screen, game.roster(), width, game.field().height, assets);
            }
        }
        Phase::Playing => {
            if let (Some(session), Some(character)) = (game.session(), game.active_character()) {
                compose_playing(canvas, &session.snapshot(), character, width, assets);
            }
        }
        Phase::Summary => {
            if let Some(rc) = game.result() {
                compose_summary(canvas, rc, width, game.field().height);
            }
        }
        Phase::Prompt => {
            if let Some(rc) = game.result() {
                compose_prompt(canvas, rc, game.pointer(), width, game.field().height);
            }
        }
        Phase::Terminated => {}
    }
}

/// x that centres `text` horizontally on a span starting at `left`.
fn centered_x<C: Canvas>(canvas: &C, text: &str, tier: FontTier, left: f32, span: f32) -> f32 {
    let (w, _) = canvas.measure(text, tier);
    left + (span - w) / 2.0
}

// ══════════════════════════════════════════════════════════════
// Selection
// ══════════════════════════════════════════════════════════════

pub fn compose_selection<C: Canvas>(
    canvas: &mut C,
    screen: &SelectionScreen,
    roster: &[Character],
    width: f32,
    height: f32,
    assets: &mut AssetProvider,
) {
    canvas.fill(Rgb::SKY_BLUE);

    let x = centered_x(canvas, TITLE, FontTier::Title, 0.0, width);
    canvas.text(TITLE, FontTier::Title, Rgb::BLACK, Point::new(x, 80.0));

    for (i, (card, character)) in screen.cards().iter().zip(roster).enumerate() {
        canvas.rect(*card, character.accent_color, RectStyle::rounded(CARD_RADIUS));

        if let Asset::Image(sprite) = assets.load(character.asset_key, (card.w, card.h)) {
            canvas.image(&sprite, Point::new(card.x, card.y));
        }

        let weight = if i == screen.cursor() { CURSOR_BORDER } else { CARD_BORDER };
        canvas.rect(*card, Rgb::BLACK, RectStyle::outline(weight, CARD_RADIUS));

        let name_x = centered_x(canvas, character.name, FontTier::Normal, card.x, card.w);
        canvas.text(character.name, FontTier::Normal, Rgb::BLACK, Point::new(name_x, card.bottom() + 10.0));
    }

    let x = centered_x(canvas, HINT, FontTier::Normal, 0.0, width);
    canvas.text(HINT, FontTier::Normal, Rgb::BLACK, Point::new(x, height - 100.0));
}

// ══════════════════════════════════════════════════════════════
// Playing
// ══════════════════════════════════════════════════════════════

pub fn compose_playing<C: Canvas>(
    canvas: &mut C,
    snap: &RoundSnapshot,
    character: &Character,
    width: f32,
    assets: &mut AssetProvider,
) {
    canvas.fill(Rgb::SKY_BLUE);

    let body = snap.player.bounds();
    match assets.load(character.asset_key, (body.w, body.h)) {
        Asset::Image(sprite) => canvas.image(&sprite, Point::new(body.x, body.y)),
        Asset::Unavailable => {
            canvas.rect(body, character.accent_color, RectStyle::rounded(PLAYER_RADIUS));
        }
    }

    for coin in &snap.coins {
        let b = coin.bounds;
        match assets.load("coin", (b.w, b.h)) {
            Asset::Image(sprite) => canvas.image(&sprite, Point::new(b.x, b.y)),
            Asset::Unavailable => {
                let c = b.center();
                canvas.circle(c, coin.radius(), Rgb::GOLD, None);
                canvas.circle(c, coin.radius(), Rgb::BLACK, Some(COIN_RING));
            }
        }
    }

    // ── HUD ──
    let score = format!("Score: {}", snap.score);
    canvas.text(&score, FontTier::Normal, Rgb::BLACK, Point::new(20.0, 20.0));

    let timer_color = if snap.time_left <= TIMER_WARNING_SECS { Rgb::RED } else { Rgb::BLACK };
    let timer = format!("Time: {}s", snap.time_left);
    canvas.text(&timer, FontTier::Normal, timer_color, Point::new(width - 150.0, 20.0));
}

// ══════════════════════════════════════════════════════════════
// Result
// ══════════════════════════════════════════════════════════════

pub fn compose_summary<C: Canvas>(canvas: &mut C, rc: &ResultController, width: f32, height: f32) {
    canvas.fill(Rgb::GRAY);
    let mid = height / 2.0;

    let comment = rc.comment();
    let x = centered_x(canvas, comment, FontTier::Huge, 0.0, width);
    canvas.text(comment, FontTier::Huge, Rgb::BLACK, Point::new(x, mid - 100.0));

    let score = format!("Total Score: {}", rc.final_score());
    let x = centered_x(canvas, &score, FontTier::Normal, 0.0, width);
    canvas.text(&score, FontTier::Normal, Rgb::BLACK, Point::new(x, mid + 20.0));

    let wait = format!("Menu in {} s...", rc.countdown());
    let x = centered_x(canvas, &wait, FontTier::Small, 0.0, width);
    canvas.text(&wait, FontTier::Small, Rgb::RED, Point::new(x, mid + 100.0));
}

pub fn compose_prompt<C: Canvas>(
    canvas: &mut C,
    rc: &ResultController,
    pointer: Option<Point>,
    width: f32,
    height: f32,
) {
    canvas.fill(Rgb::GRAY);

    let x = centered_x(canvas, ASK, FontTier::Normal, 0.0, width);
    canvas.text(ASK, FontTier::Normal, Rgb::BLACK, Point::new(x, height / 2.0 - 120.0));

    let hovered = rc.hovered(pointer);
    let buttons = rc.buttons();
    let retry_color = if hovered == Some(PromptButton::Retry) { Rgb::GREEN } else { Rgb::BLACK };
    let quit_color = if hovered == Some(PromptButton::Quit) { Rgb::RED } else { Rgb::BLACK };

    draw_button(canvas, buttons.retry, retry_color, RETRY_LABEL);
    draw_button(canvas, buttons.quit, quit_color, QUIT_LABEL);
}

fn draw_button<C: Canvas>(canvas: &mut C, rect: Rect, color: Rgb, label: &str) {
    canvas.rect(rect, color, RectStyle::rounded(BUTTON_RADIUS));
    let (w, h) = canvas.measure(label, FontTier::Normal);
    let c = rect.center();
    canvas.text(label, FontTier::Normal, Rgb::WHITE, Point::new(c.x - w / 2.0, c.y - h / 2.0));
}
