//! Master data service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    auth::{Role, SessionContext},
    domain::master_data::{
        data::{BranchDetails, IssuerDetails, PromoDetails},
        errors::MasterDataServiceError,
        models::{Branch, BranchId, Issuer, IssuerId, Promo, PromoId, RoleRecord},
        repository::MasterDataRepository,
    },
};

const EDITORS: &[Role] = &[Role::Admin];

#[derive(Clone)]
pub struct DefaultMasterDataService {
    repository: Arc<dyn MasterDataRepository>,
}

impl DefaultMasterDataService {
    #[must_use]
    pub fn new(repository: Arc<dyn MasterDataRepository>) -> Self {
        Self { repository }
    }
}

impl std::fmt::Debug for DefaultMasterDataService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultMasterDataService")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MasterDataService for DefaultMasterDataService {
    async fn list_branches(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<Branch>, MasterDataServiceError> {
        Ok(self.repository.list_branches(session.token()).await?)
    }

    async fn create_branch(
        &self,
        session: &SessionContext,
        details: BranchDetails,
    ) -> Result<Branch, MasterDataServiceError> {
        session.require_any(EDITORS)?;

        let details = details.validated()?;
        let branch = self
            .repository
            .create_branch(session.token(), &details)
            .await?;

        info!(branch = %branch.id, name = %branch.name, "branch created");

        Ok(branch)
    }

    async fn update_branch(
        &self,
        session: &SessionContext,
        branch: BranchId,
        details: BranchDetails,
    ) -> Result<Branch, MasterDataServiceError> {
        session.require_any(EDITORS)?;

        let details = details.validated()?;

        self.repository
            .update_branch(session.token(), branch, &details)
            .await?
            .ok_or(MasterDataServiceError::NotFound)
    }

    async fn delete_branch(
        &self,
        session: &SessionContext,
        branch: BranchId,
    ) -> Result<(), MasterDataServiceError> {
        session.require_any(EDITORS)?;

        if !self.repository.delete_branch(session.token(), branch).await? {
            return Err(MasterDataServiceError::NotFound);
        }

        info!(branch = %branch, "branch deleted");

        Ok(())
    }

    async fn list_promos(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<Promo>, MasterDataServiceError> {
        Ok(self.repository.list_promos(session.token()).await?)
    }

    async fn create_promo(
        &self,
        session: &SessionContext,
        details: PromoDetails,
    ) -> Result<Promo, MasterDataServiceError> {
        session.require_any(EDITORS)?;

        let details = details.validated()?;
        let promo = self
            .repository
            .create_promo(session.token(), &details)
            .await?;

        info!(promo = %promo.id, kind = %promo.kind, "promotion created");

        Ok(promo)
    }

    async fn update_promo(
        &self,
        session: &SessionContext,
        promo: PromoId,
        details: PromoDetails,
    ) -> Result<Promo, MasterDataServiceError> {
        session.require_any(EDITORS)?;

        let details = details.validated()?;

        self.repository
            .update_promo(session.token(), promo, &details)
            .await?
            .ok_or(MasterDataServiceError::NotFound)
    }

    async fn delete_promo(
        &self,
        session: &SessionContext,
        promo: PromoId,
    ) -> Result<(), MasterDataServiceError> {
        session.require_any(EDITORS)?;

        if !self.repository.delete_promo(session.token(), promo).await? {
            return Err(MasterDataServiceError::NotFound);
        }

        Ok(())
    }

    async fn list_issuers(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<Issuer>, MasterDataServiceError> {
        Ok(self.repository.list_issuers(session.token()).await?)
    }

    async fn create_issuer(
        &self,
        session: &SessionContext,
        details: IssuerDetails,
    ) -> Result<Issuer, MasterDataServiceError> {
        session.require_any(EDITORS)?;

        let details = details.validated()?;
        let issuer = self
            .repository
            .create_issuer(session.token(), &details)
            .await?;

        info!(issuer = %issuer.id, "issuer created");

        Ok(issuer)
    }

    async fn update_issuer(
        &self,
        session: &SessionContext,
        issuer: IssuerId,
        details: IssuerDetails,
    ) -> Result<Issuer, MasterDataServiceError> {
        session.require_any(EDITORS)?;

        let details = details.validated()?;

        self.repository
            .update_issuer(session.token(), issuer, &details)
            .await?
            .ok_or(MasterDataServiceError::NotFound)
    }

    async fn delete_issuer(
        &self,
        session: &SessionContext,
        issuer: IssuerId,
    ) -> Result<(), MasterDataServiceError> {
        session.require_any(EDITORS)?;

        if !self.repository.delete_issuer(session.token(), issuer).await? {
            return Err(MasterDataServiceError::NotFound);
        }

        Ok(())
    }

    async fn list_roles(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<RoleRecord>, MasterDataServiceError> {
        Ok(self.repository.list_roles(session.token()).await?)
    }
}

#[automock]
#[async_trait]
pub trait MasterDataService: Send + Sync {
    /// All branches, by name. Open to every role.
    async fn list_branches(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<Branch>, MasterDataServiceError>;

    async fn create_branch(
        &self,
        session: &SessionContext,
        details: BranchDetails,
    ) -> Result<Branch, MasterDataServiceError>;

    async fn update_branch(
        &self,
        session: &SessionContext,
        branch: BranchId,
        details: BranchDetails,
    ) -> Result<Branch, MasterDataServiceError>;

    /// Fails with `InvalidReference` while coupons or users still point at the branch.
    async fn delete_branch(
        &self,
        session: &SessionContext,
        branch: BranchId,
    ) -> Result<(), MasterDataServiceError>;

    /// All promotion types. Open to every role.
    async fn list_promos(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<Promo>, MasterDataServiceError>;

    async fn create_promo(
        &self,
        session: &SessionContext,
        details: PromoDetails,
    ) -> Result<Promo, MasterDataServiceError>;

    async fn update_promo(
        &self,
        session: &SessionContext,
        promo: PromoId,
        details: PromoDetails,
    ) -> Result<Promo, MasterDataServiceError>;

    async fn delete_promo(
        &self,
        session: &SessionContext,
        promo: PromoId,
    ) -> Result<(), MasterDataServiceError>;

    /// All issuers. Open to every role.
    async fn list_issuers(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<Issuer>, MasterDataServiceError>;

    async fn create_issuer(
        &self,
        session: &SessionContext,
        details: IssuerDetails,
    ) -> Result<Issuer, MasterDataServiceError>;

    async fn update_issuer(
        &self,
        session: &SessionContext,
        issuer: IssuerId,
        details: IssuerDetails,
    ) -> Result<Issuer, MasterDataServiceError>;

    async fn delete_issuer(
        &self,
        session: &SessionContext,
        issuer: IssuerId,
    ) -> Result<(), MasterDataServiceError>;

    /// Assignable roles. Open to every role.
    async fn list_roles(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<RoleRecord>, MasterDataServiceError>;
}
