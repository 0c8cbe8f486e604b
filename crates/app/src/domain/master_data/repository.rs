//! Master data repository.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    backend::{AccessToken, BackendError, Query, RestClient},
    domain::master_data::{
        data::{BranchDetails, BranchRow, IssuerDetails, IssuerRow, PromoDetails, PromoRow},
        models::{Branch, BranchId, Issuer, IssuerId, Promo, PromoId, RoleRecord},
    },
};

const BRANCHES_TABLE: &str = "branches";
const PROMOS_TABLE: &str = "promos";
const ISSUERS_TABLE: &str = "issuers";
const ROLES_TABLE: &str = "roles";

#[automock]
#[async_trait]
pub trait MasterDataRepository: Send + Sync {
    async fn list_branches(&self, token: &AccessToken) -> Result<Vec<Branch>, BackendError>;

    async fn create_branch(
        &self,
        token: &AccessToken,
        details: &BranchDetails,
    ) -> Result<Branch, BackendError>;

    /// `None` when no branch has the given id.
    async fn update_branch(
        &self,
        token: &AccessToken,
        branch: BranchId,
        details: &BranchDetails,
    ) -> Result<Option<Branch>, BackendError>;

    /// `false` when no branch has the given id.
    async fn delete_branch(&self, token: &AccessToken, branch: BranchId)
    -> Result<bool, BackendError>;

    async fn list_promos(&self, token: &AccessToken) -> Result<Vec<Promo>, BackendError>;

    async fn find_promo(
        &self,
        token: &AccessToken,
        promo: PromoId,
    ) -> Result<Option<Promo>, BackendError>;

    async fn create_promo(
        &self,
        token: &AccessToken,
        details: &PromoDetails,
    ) -> Result<Promo, BackendError>;

    async fn update_promo(
        &self,
        token: &AccessToken,
        promo: PromoId,
        details: &PromoDetails,
    ) -> Result<Option<Promo>, BackendError>;

    async fn delete_promo(&self, token: &AccessToken, promo: PromoId) -> Result<bool, BackendError>;

    async fn list_issuers(&self, token: &AccessToken) -> Result<Vec<Issuer>, BackendError>;

    async fn find_issuer(
        &self,
        token: &AccessToken,
        issuer: IssuerId,
    ) -> Result<Option<Issuer>, BackendError>;

    async fn create_issuer(
        &self,
        token: &AccessToken,
        details: &IssuerDetails,
    ) -> Result<Issuer, BackendError>;

    async fn update_issuer(
        &self,
        token: &AccessToken,
        issuer: IssuerId,
        details: &IssuerDetails,
    ) -> Result<Option<Issuer>, BackendError>;

    async fn delete_issuer(
        &self,
        token: &AccessToken,
        issuer: IssuerId,
    ) -> Result<bool, BackendError>;

    async fn list_roles(&self, token: &AccessToken) -> Result<Vec<RoleRecord>, BackendError>;
}

#[derive(Debug, Clone)]
pub struct RestMasterDataRepository {
    client: RestClient,
}

impl RestMasterDataRepository {
    #[must_use]
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

fn by_id(id: i64) -> Query {
    Query::new().eq("id", id)
}

fn single<T>(rows: Vec<T>) -> Result<T, BackendError> {
    rows.into_iter().next().ok_or_else(|| BackendError::Unexpected {
        status: 200,
        message: "insert returned no rows".to_string(),
    })
}

#[async_trait]
impl MasterDataRepository for RestMasterDataRepository {
    async fn list_branches(&self, token: &AccessToken) -> Result<Vec<Branch>, BackendError> {
        self.client
            .select(token, BRANCHES_TABLE, &Query::new().select("*").order_asc("name"))
            .await
    }

    async fn create_branch(
        &self,
        token: &AccessToken,
        details: &BranchDetails,
    ) -> Result<Branch, BackendError> {
        let rows = self
            .client
            .insert(token, BRANCHES_TABLE, &BranchRow::from(details))
            .await?;

        single(rows)
    }

    async fn update_branch(
        &self,
        token: &AccessToken,
        branch: BranchId,
        details: &BranchDetails,
    ) -> Result<Option<Branch>, BackendError> {
        let rows: Vec<Branch> = self
            .client
            .update(
                token,
                BRANCHES_TABLE,
                &by_id(branch.into_i64()),
                &BranchRow::from(details),
            )
            .await?;

        Ok(rows.into_iter().next())
    }

    async fn delete_branch(
        &self,
        token: &AccessToken,
        branch: BranchId,
    ) -> Result<bool, BackendError> {
        let removed = self
            .client
            .delete(token, BRANCHES_TABLE, &by_id(branch.into_i64()))
            .await?;

        Ok(removed > 0)
    }

    async fn list_promos(&self, token: &AccessToken) -> Result<Vec<Promo>, BackendError> {
        self.client
            .select(token, PROMOS_TABLE, &Query::new().select("*").order_asc("type_name"))
            .await
    }

    async fn find_promo(
        &self,
        token: &AccessToken,
        promo: PromoId,
    ) -> Result<Option<Promo>, BackendError> {
        let rows: Vec<Promo> = self
            .client
            .select(
                token,
                PROMOS_TABLE,
                &by_id(promo.into_i64()).select("*").limit(1),
            )
            .await?;

        Ok(rows.into_iter().next())
    }

    async fn create_promo(
        &self,
        token: &AccessToken,
        details: &PromoDetails,
    ) -> Result<Promo, BackendError> {
        let rows = self
            .client
            .insert(token, PROMOS_TABLE, &PromoRow::from(details))
            .await?;

        single(rows)
    }

    async fn update_promo(
        &self,
        token: &AccessToken,
        promo: PromoId,
        details: &PromoDetails,
    ) -> Result<Option<Promo>, BackendError> {
        let rows: Vec<Promo> = self
            .client
            .update(
                token,
                PROMOS_TABLE,
                &by_id(promo.into_i64()),
                &PromoRow::from(details),
            )
            .await?;

        Ok(rows.into_iter().next())
    }

    async fn delete_promo(&self, token: &AccessToken, promo: PromoId) -> Result<bool, BackendError> {
        let removed = self
            .client
            .delete(token, PROMOS_TABLE, &by_id(promo.into_i64()))
            .await?;

        Ok(removed > 0)
    }

    async fn list_issuers(&self, token: &AccessToken) -> Result<Vec<Issuer>, BackendError> {
        self.client
            .select(
                token,
                ISSUERS_TABLE,
                &Query::new().select("*").order_asc("issuer_name"),
            )
            .await
    }

    async fn find_issuer(
        &self,
        token: &AccessToken,
        issuer: IssuerId,
    ) -> Result<Option<Issuer>, BackendError> {
        let rows: Vec<Issuer> = self
            .client
            .select(
                token,
                ISSUERS_TABLE,
                &by_id(issuer.into_i64()).select("*").limit(1),
            )
            .await?;

        Ok(rows.into_iter().next())
    }

    async fn create_issuer(
        &self,
        token: &AccessToken,
        details: &IssuerDetails,
    ) -> Result<Issuer, BackendError> {
        let rows = self
            .client
            .insert(token, ISSUERS_TABLE, &IssuerRow::from(details))
            .await?;

        single(rows)
    }

    async fn update_issuer(
        &self,
        token: &AccessToken,
        issuer: IssuerId,
        details: &IssuerDetails,
    ) -> Result<Option<Issuer>, BackendError> {
        let rows: Vec<Issuer> = self
            .client
            .update(
                token,
                ISSUERS_TABLE,
                &by_id(issuer.into_i64()),
                &IssuerRow::from(details),
            )
            .await?;

        Ok(rows.into_iter().next())
    }

    async fn delete_issuer(
        &self,
        token: &AccessToken,
        issuer: IssuerId,
    ) -> Result<bool, BackendError> {
        let removed = self
            .client
            .delete(token, ISSUERS_TABLE, &by_id(issuer.into_i64()))
            .await?;

        Ok(removed > 0)
    }

    async fn list_roles(&self, token: &AccessToken) -> Result<Vec<RoleRecord>, BackendError> {
        self.client
            .select(token, ROLES_TABLE, &Query::new().select("*").order_asc("id"))
            .await
    }
}
