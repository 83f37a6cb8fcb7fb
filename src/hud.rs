//! Pushes round state into the page's HUD elements

use crate::names::PlayerNames;
use crate::platform::Hud;
use crate::sim::{Outcome, RoundState, Side};

pub fn sync_health(hud: &mut impl Hud, state: &RoundState) {
    for side in Side::BOTH {
        hud.set_health(side, state.player(side).health);
    }
}

pub fn sync_names(hud: &mut impl Hud, names: &PlayerNames) {
    for side in Side::BOTH {
        let label = names.label(side);
        hud.set_label(side, &label);
        hud.set_name_display(side, &label);
    }
}

/// Banner text for a finished round
pub fn outcome_text(outcome: Outcome, names: &PlayerNames) -> String {
    match outcome {
        Outcome::Draw => "It's a draw!".to_string(),
        Outcome::Winner(side) => format!("{} wins!", names.label(side)),
    }
}

/// Full refresh: labels, health and the outcome banner
pub fn sync_all(hud: &mut impl Hud, state: &RoundState, names: &PlayerNames) {
    sync_names(hud, names);
    sync_health(hud, state);
    let banner = state
        .outcome()
        .map(|outcome| outcome_text(outcome, names))
        .unwrap_or_default();
    hud.set_outcome(&banner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::testing::RecordingHud;
    use crate::sim::RoundPhase;
    use crate::tuning::Tuning;

    #[test]
    fn test_outcome_text() {
        let mut names = PlayerNames::default();
        names.set(Side::Two, "Grace");
        assert_eq!(outcome_text(Outcome::Draw, &names), "It's a draw!");
        assert_eq!(
            outcome_text(Outcome::Winner(Side::Two), &names),
            "🟥 Grace wins!"
        );
        assert_eq!(
            outcome_text(Outcome::Winner(Side::One), &names),
            "🟦 Player 1 wins!"
        );
    }

    #[test]
    fn test_sync_all_mid_round_clears_banner() {
        let mut hud = RecordingHud::default();
        let mut state = RoundState::new(Tuning::default());
        state.player_mut(Side::One).health = 70;

        sync_all(&mut hud, &state, &PlayerNames::default());

        assert_eq!(hud.health, [Some(70), Some(100)]);
        assert_eq!(hud.labels[0], "🟦 Player 1");
        assert_eq!(hud.name_displays[1], "🟥 Player 2");
        assert_eq!(hud.outcome.as_deref(), Some(""));
    }

    #[test]
    fn test_sync_all_after_round_shows_winner() {
        let mut hud = RecordingHud::default();
        let mut state = RoundState::new(Tuning::default());
        state.phase = RoundPhase::Ended(Outcome::Winner(Side::One));

        sync_all(&mut hud, &state, &PlayerNames::default());

        assert_eq!(hud.outcome.as_deref(), Some("🟦 Player 1 wins!"));
    }
}
