//! REST adapter for the hosted backend.
//!
//! Talks to a PostgREST-style table API under `{url}/rest/v1/{table}`.
//! Every request carries the project API key and, when the session holds
//! one, the user's bearer token so row-level policies apply.

use crate::session::Session;
use crate::store::base::{collections, Store, StoreError, StoreResult};
use async_trait::async_trait;
use fk_protocol::{
    BackendConfig, CompletionRecord, DayOfWeek, MealPlan, Routine, RoutineEdit, RoutineStatus,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
    bearer: String,
}

impl RestStore {
    /// Create a store for `base_url` authenticating with `api_key`.
    ///
    /// Requests run as `session`'s user when it carries an access token and
    /// as the anonymous role otherwise.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, session: &Session) -> Self {
        let api_key = api_key.into();
        let bearer = session
            .access_token
            .clone()
            .unwrap_or_else(|| api_key.clone());
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            bearer,
        }
    }

    /// Build a store from `[backend]` settings, reading the key from the
    /// configured environment variable.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the variable is unset.
    pub fn from_config(config: &BackendConfig, session: &Session) -> StoreResult<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            StoreError::Unavailable(format!(
                "environment variable {} is not set",
                config.api_key_env
            ))
        })?;
        Ok(Self::new(config.url.clone(), api_key, session))
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.bearer)
    }

    async fn send(&self, collection: &'static str, request: RequestBuilder) -> StoreResult<Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed {
                collection,
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(StoreError::RequestFailed {
            collection,
            reason: format!("HTTP {}: {}", status, body),
        })
    }

    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        collection: &'static str,
        filters: &[(&str, String)],
    ) -> StoreResult<Vec<T>> {
        let request = self
            .client
            .get(self.table_url(collection))
            .query(&[("select", "*")])
            .query(filters);
        let response = self.send(collection, request).await?;
        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| StoreError::UnexpectedResponse {
                collection,
                reason: e.to_string(),
            })
    }
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{}", value)
}

/// Case-insensitive equality on an owner column, matching
/// [`same_owner`](crate::session::same_owner). LIKE wildcards in the
/// address are escaped so they match literally.
fn owner_filter(owner: &str) -> String {
    let mut escaped = String::with_capacity(owner.len());
    for c in owner.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("ilike.{}", escaped)
}

#[async_trait]
impl Store for RestStore {
    async fn get_routine(&self, id: Uuid) -> StoreResult<Routine> {
        debug!(routine_id = %id, "fetching routine");
        let rows: Vec<Routine> = self
            .fetch_rows(collections::ROUTINES, &[("id", eq(id))])
            .await?;
        rows.into_iter().next().ok_or_else(|| StoreError::NotFound {
            collection: collections::ROUTINES,
            id: id.to_string(),
        })
    }

    async fn list_routines(&self, owner: &str) -> StoreResult<Vec<Routine>> {
        self.fetch_rows(collections::ROUTINES, &[("user_email", owner_filter(owner))])
            .await
    }

    async fn update_routine_exercises(&self, id: Uuid, edit: &RoutineEdit) -> StoreResult<()> {
        debug!(routine_id = %id, exercises = edit.exercises.len(), "updating routine");
        let request = self
            .client
            .patch(self.table_url(collections::ROUTINES))
            .query(&[("id", eq(id))])
            .header("Prefer", "return=minimal")
            .json(&json!({
                "day_of_week": edit.day_of_week,
                "exercises": edit.exercises,
                "updated_at": chrono::Utc::now(),
            }));
        self.send(collections::ROUTINES, request).await?;
        Ok(())
    }

    async fn update_routine_status(&self, id: Uuid, status: RoutineStatus) -> StoreResult<()> {
        let request = self
            .client
            .patch(self.table_url(collections::ROUTINES))
            .query(&[("id", eq(id))])
            .header("Prefer", "return=minimal")
            .json(&json!({ "status": status }));
        self.send(collections::ROUTINES, request).await?;
        Ok(())
    }

    async fn insert_completion(&self, record: &CompletionRecord) -> StoreResult<()> {
        let request = self
            .client
            .post(self.table_url(collections::HISTORY))
            .header("Prefer", "return=minimal")
            .json(record);
        self.send(collections::HISTORY, request).await?;
        Ok(())
    }

    async fn find_meal_plan(&self, owner: &str, day: DayOfWeek) -> StoreResult<Option<MealPlan>> {
        let rows: Vec<MealPlan> = self
            .fetch_rows(
                collections::MEAL_PLANS,
                &[("user_email", owner_filter(owner)), ("day", eq(day.label()))],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_meal_plan(&self, plan: &MealPlan) -> StoreResult<()> {
        let request = self
            .client
            .post(self.table_url(collections::MEAL_PLANS))
            .header("Prefer", "return=minimal")
            .json(plan);
        self.send(collections::MEAL_PLANS, request).await?;
        Ok(())
    }

    async fn update_meal_plan(&self, plan: &MealPlan) -> StoreResult<()> {
        let request = self
            .client
            .patch(self.table_url(collections::MEAL_PLANS))
            .query(&[("id", eq(plan.id))])
            .header("Prefer", "return=minimal")
            .json(&json!({ "meals": plan.meals, "status": plan.status }));
        self.send(collections::MEAL_PLANS, request).await?;
        Ok(())
    }
}
