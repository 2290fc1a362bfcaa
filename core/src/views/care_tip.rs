//! "Pet Care Tips Of The Day" widget.

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::warn;

use crate::api::Api;
use crate::http::Transport;
use crate::session::Storage;
use crate::types::CareTip;

pub const TITLE: &str = "Pet Care Tips Of The Day";
pub const BUTTON: &str = "Get A Tip";
pub const LOAD_FAILED: &str = "Failed to load the tip. Try later";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TipState {
    /// Nothing requested yet.
    #[default]
    Idle,
    Shown(CareTip),
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CareTipWidget {
    state: TipState,
}

impl CareTipWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TipState {
        &self.state
    }

    /// The "Get A Tip" button: fetch the feed and show one tip at random.
    pub fn get_tip<T: Transport, S: Storage, R: Rng + ?Sized>(
        &mut self,
        api: &Api<T, S>,
        rng: &mut R,
    ) -> &TipState {
        self.state = match api.care_tips() {
            Ok(tips) => match tips.choose(rng) {
                Some(tip) => TipState::Shown(tip.clone()),
                None => {
                    warn!("care tip feed was empty");
                    TipState::Failed
                }
            },
            Err(e) => {
                warn!(error = %e, "could not fetch care tips");
                TipState::Failed
            }
        };
        &self.state
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![TITLE.to_string(), BUTTON.to_string()];
        match &self.state {
            TipState::Idle => {}
            TipState::Shown(tip) => lines.push(tip.tip.clone()),
            TipState::Failed => lines.push(LOAD_FAILED.to_string()),
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::session::MemoryStorage;
    use crate::testing::{canned, client, unreachable_server};

    #[test]
    fn renders_initial_state() {
        assert_eq!(CareTipWidget::new().render(), vec![TITLE, BUTTON]);
    }

    #[test]
    fn displays_a_tip() {
        let (transport, seen) = canned(200, r#"{"tips":[{"tip":"Test tip","category":"health"}]}"#);
        let api = Api::init(client(), transport, MemoryStorage::new());
        let mut widget = CareTipWidget::new();

        widget.get_tip(&api, &mut StdRng::seed_from_u64(7));

        assert!(widget.render().contains(&"Test tip".to_string()));
        assert_eq!(seen.borrow()[0].path, "http://localhost:3000/tips");
    }

    #[test]
    fn picks_from_the_feed() {
        let (transport, _) = canned(
            200,
            r#"{"tips":[{"tip":"Brush daily"},{"tip":"Fresh water"},{"tip":"Annual checkup"}]}"#,
        );
        let api = Api::init(client(), transport, MemoryStorage::new());
        let mut widget = CareTipWidget::new();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10 {
            let TipState::Shown(tip) = widget.get_tip(&api, &mut rng) else {
                panic!("expected a tip");
            };
            assert!(["Brush daily", "Fresh water", "Annual checkup"].contains(&tip.tip.as_str()));
        }
    }

    #[test]
    fn fetch_failure_shows_message() {
        let api = Api::init(client(), unreachable_server, MemoryStorage::new());
        let mut widget = CareTipWidget::new();
        widget.get_tip(&api, &mut StdRng::seed_from_u64(7));
        assert_eq!(widget.render(), vec![TITLE, BUTTON, LOAD_FAILED]);
    }

    #[test]
    fn empty_feed_counts_as_failure() {
        let (transport, _) = canned(200, r#"{"tips":[]}"#);
        let api = Api::init(client(), transport, MemoryStorage::new());
        let mut widget = CareTipWidget::new();
        assert_eq!(widget.get_tip(&api, &mut StdRng::seed_from_u64(7)), &TipState::Failed);
    }
}
