use anyhow::Result;
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;

use crate::catalog::ModelCatalog;
use crate::config::Config;
use crate::credential::Credential;
use crate::model::{self, EndpointPolicy, Reply};
use crate::providers;

pub type GatewayFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// The two provider calls the chat loop depends on.
pub trait ModelGateway {
    /// Fetches the curated model catalog.
    fn list_models<'a>(&'a self, credential: &'a Credential)
    -> GatewayFuture<'a, Result<ModelCatalog>>;

    /// Sends one prompt. Never fails; errors come back as [`Reply::Failed`].
    fn generate<'a>(
        &'a self,
        credential: &'a Credential,
        model_id: &'a str,
        prompt: &'a str,
    ) -> GatewayFuture<'a, Reply>;
}

pub struct GroqGateway<'a> {
    client: &'a Client,
    cfg: &'a Config,
    policy: Box<dyn EndpointPolicy + 'a>,
}

impl<'a> GroqGateway<'a> {
    pub fn new(client: &'a Client, cfg: &'a Config) -> Self {
        Self {
            client,
            cfg,
            policy: model::policy_from_config(cfg),
        }
    }

    pub fn with_policy(
        client: &'a Client,
        cfg: &'a Config,
        policy: impl EndpointPolicy + 'a,
    ) -> Self {
        Self {
            client,
            cfg,
            policy: Box::new(policy),
        }
    }
}

impl ModelGateway for GroqGateway<'_> {
    fn list_models<'b>(
        &'b self,
        credential: &'b Credential,
    ) -> GatewayFuture<'b, Result<ModelCatalog>> {
        Box::pin(async move {
            let models = providers::groq::list_models(self.client, self.cfg, credential).await?;
            Ok(ModelCatalog::curated(
                models,
                &self.cfg.catalog_excluded_positions,
            ))
        })
    }

    fn generate<'b>(
        &'b self,
        credential: &'b Credential,
        model_id: &'b str,
        prompt: &'b str,
    ) -> GatewayFuture<'b, Reply> {
        Box::pin(async move {
            model::generate(
                self.client,
                self.cfg,
                self.policy.as_ref(),
                credential,
                model_id,
                prompt,
            )
            .await
        })
    }
}
