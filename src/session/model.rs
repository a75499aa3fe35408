use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::access::{Page, UpgradeNotice, UserAccount, check_feature_access};
use crate::content::{GeneratedContent, GenerationParams};
use crate::error::{AppError, SelectionError, SessionError};
use crate::providers::{Fan, FanId, GenerationService, Segment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalTargets {
    pub target_revenue: u64,
    pub target_subs: u64,
}

impl Default for GoalTargets {
    fn default() -> Self {
        Self {
            target_revenue: 10_000,
            target_subs: 80,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum NavigationOutcome {
    Navigated { page: Page },
    UpgradeRequired { page: Page, notice: UpgradeNotice },
}

/// Everything one operator has selected since signing in.
///
/// A default session is signed out and empty.
#[derive(Debug, Clone, Default)]
pub struct Session {
    authenticated: bool,
    user: Option<UserAccount>,
    current_account: Option<String>,
    current_page: Page,
    selected_fan_id: Option<FanId>,
    segment_filter: BTreeSet<Segment>,
    ai_suggestion: Option<String>,
    generated_content: Option<GeneratedContent>,
    selected_variant_indices: BTreeSet<usize>,
    goals: GoalTargets,
}

impl Session {
    pub fn logged_in(user: UserAccount) -> Self {
        Self {
            authenticated: true,
            current_account: user.accounts.first().cloned(),
            user: Some(user),
            ..Self::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn user(&self) -> Result<&UserAccount, SessionError> {
        match (&self.user, self.authenticated) {
            (Some(user), true) => Ok(user),
            _ => Err(SessionError::NotAuthenticated),
        }
    }

    pub fn current_account(&self) -> Option<&str> {
        self.current_account.as_deref()
    }

    pub fn current_page(&self) -> Page {
        self.current_page
    }

    pub fn selected_fan_id(&self) -> Option<FanId> {
        self.selected_fan_id
    }

    pub fn segment_filter(&self) -> &BTreeSet<Segment> {
        &self.segment_filter
    }

    pub fn ai_suggestion(&self) -> Option<&str> {
        self.ai_suggestion.as_deref()
    }

    pub fn generated_content(&self) -> Option<&GeneratedContent> {
        self.generated_content.as_ref()
    }

    pub fn selected_variant_indices(&self) -> &BTreeSet<usize> {
        &self.selected_variant_indices
    }

    pub fn goals(&self) -> GoalTargets {
        self.goals
    }

    /// Checked on every request: a lapsed plan ends the session.
    pub fn revalidate(&self, now: DateTime<Utc>) -> Result<(), SessionError> {
        if self.user()?.is_expired_at(now) {
            return Err(SessionError::Expired);
        }
        Ok(())
    }

    /// Drops the operator and every selection made so far.
    pub fn logout(self) -> Session {
        Session::default()
    }

    pub fn select_account(&mut self, account: &str) -> Result<(), SelectionError> {
        let owned = self.user.as_ref().is_some_and(|u| u.owns_account(account));
        if !owned {
            return Err(SelectionError::AccountNotOwned(account.to_string()));
        }

        if self.current_account.as_deref() != Some(account) {
            // fan ids belong to an account's directory
            self.selected_fan_id = None;
            self.ai_suggestion = None;
            self.current_account = Some(account.to_string());
            tracing::debug!(account, "Switched account");
        }
        Ok(())
    }

    pub fn navigate(&mut self, page: Page) -> NavigationOutcome {
        let feature = page.required_feature();
        if !check_feature_access(self, feature) {
            tracing::debug!(?page, "Navigation blocked by plan");
            return NavigationOutcome::UpgradeRequired {
                page: self.current_page,
                notice: UpgradeNotice::for_feature(feature),
            };
        }

        self.current_page = page;
        NavigationOutcome::Navigated { page }
    }

    /// Fans passing the active segment filter, in directory order.
    pub fn visible_fans<'a>(&self, fans: &'a [Fan]) -> Vec<&'a Fan> {
        fans.iter()
            .filter(|fan| self.segment_filter.is_empty() || self.segment_filter.contains(&fan.segment))
            .collect()
    }

    /// Moves the fan selection onto the visible list: kept if still visible,
    /// otherwise the first visible fan, or none.
    pub fn reconcile_fan_selection<'a>(&mut self, fans: &'a [Fan]) -> Vec<&'a Fan> {
        let visible = self.visible_fans(fans);
        let still_visible = self
            .selected_fan_id
            .is_some_and(|id| visible.iter().any(|fan| fan.id == id));

        if !still_visible {
            self.selected_fan_id = visible.first().map(|fan| fan.id);
        }
        visible
    }

    pub fn apply_segment_filter<'a>(
        &mut self,
        fans: &'a [Fan],
        segments: BTreeSet<Segment>,
    ) -> Vec<&'a Fan> {
        self.segment_filter = segments;
        self.reconcile_fan_selection(fans)
    }

    pub fn select_fan(&mut self, fans: &[Fan], id: FanId) -> Result<(), SelectionError> {
        if !self.visible_fans(fans).iter().any(|fan| fan.id == id) {
            return Err(SelectionError::NotInFilteredSet(id));
        }
        if self.selected_fan_id != Some(id) {
            self.ai_suggestion = None;
        }
        self.selected_fan_id = Some(id);
        Ok(())
    }

    pub fn set_suggestion(&mut self, text: String) {
        self.ai_suggestion = Some(text);
    }

    pub fn clear_draft(&mut self) {
        self.ai_suggestion = None;
    }

    pub fn set_goals(&mut self, goals: GoalTargets) {
        self.goals = goals;
    }

    pub async fn start_generation(
        &mut self,
        params: GenerationParams,
        generator: &dyn GenerationService,
    ) -> Result<&GeneratedContent, AppError> {
        params.validate()?;

        let urls = generator
            .generate(
                params.kind,
                &params.prompt,
                &params.model,
                &params.lora,
                params.variants,
            )
            .await?;

        tracing::info!(kind = ?params.kind, variants = urls.len(), "Generated content batch");
        self.selected_variant_indices.clear();
        let content = self.generated_content.insert(GeneratedContent {
            kind: params.kind,
            urls,
            params,
        });
        Ok(&*content)
    }

    /// Runs the last generation again with unchanged params.
    pub async fn regenerate(
        &mut self,
        generator: &dyn GenerationService,
    ) -> Result<&GeneratedContent, AppError> {
        let params = self
            .generated_content
            .as_ref()
            .map(|content| content.params.clone())
            .ok_or(SelectionError::NoGeneratedContent)?;
        self.start_generation(params, generator).await
    }

    /// Flips one variant in or out of the selection and returns its new state.
    pub fn toggle_variant(&mut self, index: i64) -> Result<bool, SelectionError> {
        let len = self
            .generated_content
            .as_ref()
            .map(|content| content.urls.len())
            .ok_or(SelectionError::NoGeneratedContent)?;

        let slot = usize::try_from(index)
            .ok()
            .filter(|&slot| slot < len)
            .ok_or(SelectionError::InvalidVariantIndex { index, len })?;

        if self.selected_variant_indices.remove(&slot) {
            Ok(false)
        } else {
            self.selected_variant_indices.insert(slot);
            Ok(true)
        }
    }

    pub fn clear_generation(&mut self) {
        self.generated_content = None;
        self.selected_variant_indices.clear();
    }

    /// URLs of the selected variants, in index order.
    pub fn selected_variants(&self) -> Result<Vec<&str>, SelectionError> {
        let content = self
            .generated_content
            .as_ref()
            .ok_or(SelectionError::NoGeneratedContent)?;
        if self.selected_variant_indices.is_empty() {
            return Err(SelectionError::EmptyVariantSelection);
        }

        Ok(self
            .selected_variant_indices
            .iter()
            .filter_map(|&i| content.urls.get(i).map(String::as_str))
            .collect())
    }
}
