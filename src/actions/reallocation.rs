use crate::entities::{AllocationType, BeneficiaryAllocation, User};
use crate::repository::{
    BeneficiaryAllocationRepository, BeneficiaryRepository, HousingRepository,
    HousingRoomRepository, NewAllocation, OrganizationRepository, Page,
};
use crate::{guards, Error};

/// Destination of a reallocation. Leaving `room_id` unset keeps the
/// beneficiary's current room; it does not vacate it. Callers must pass the
/// room explicitly to change it.
#[derive(Debug, Clone)]
pub struct ReallocationInput {
    pub housing_id: String,
    pub room_id: Option<String>,
}

/// Action to move a beneficiary to another housing, leaving an audit trail.
///
/// This action:
/// 1. Loads the beneficiary and its current organization
/// 2. Verifies the actor administers that organization
/// 3. Snapshots the current placement before anything moves
/// 4. Points the beneficiary at the destination housing (and room, if given)
/// 5. Persists the beneficiary, then appends the `Reallocation` audit record
///
/// The two writes are not transactional on their own. If the audit insert
/// fails, the beneficiary is restored to the snapshotted placement so a move
/// never outlives its audit trail.
pub struct CreateReallocationAction<A, B, O, H, R>
where
    A: BeneficiaryAllocationRepository,
    B: BeneficiaryRepository,
    O: OrganizationRepository,
    H: HousingRepository,
    R: HousingRoomRepository,
{
    allocation_repo: A,
    beneficiary_repo: B,
    organization_repo: O,
    housing_repo: H,
    room_repo: R,
}

impl<A, B, O, H, R> CreateReallocationAction<A, B, O, H, R>
where
    A: BeneficiaryAllocationRepository,
    B: BeneficiaryRepository,
    O: OrganizationRepository,
    H: HousingRepository,
    R: HousingRoomRepository,
{
    pub fn new(
        allocation_repo: A,
        beneficiary_repo: B,
        organization_repo: O,
        housing_repo: H,
        room_repo: R,
    ) -> Self {
        Self {
            allocation_repo,
            beneficiary_repo,
            organization_repo,
            housing_repo,
            room_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "create_reallocation", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        beneficiary_id: &str,
        input: ReallocationInput,
    ) -> Result<BeneficiaryAllocation, Error> {
        let mut beneficiary = self
            .beneficiary_repo
            .find_by_id(beneficiary_id)
            .await?
            .ok_or(Error::BeneficiaryNotFound)?;

        let organization = self
            .organization_repo
            .find_by_id(&beneficiary.current_organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::is_organization_admin(actor, &organization)?;

        // capture the placement before mutating it; the audit record needs it
        let old_housing_id = beneficiary.current_housing_id.clone();
        let old_room_id = beneficiary.current_room_id.clone();

        let housing = self
            .housing_repo
            .find_by_id(&input.housing_id)
            .await?
            .ok_or(Error::HousingNotFound)?;

        beneficiary.current_housing_id = Some(housing.id.clone());

        if let Some(room_id) = &input.room_id {
            let room = self
                .room_repo
                .find_by_id(room_id)
                .await?
                .ok_or(Error::HousingRoomNotFound)?;

            beneficiary.current_room_id = Some(room.id);
        }

        self.beneficiary_repo
            .update(&beneficiary.id, beneficiary.clone())
            .await?;

        let allocation = self
            .allocation_repo
            .create(NewAllocation {
                beneficiary_id: beneficiary.id.clone(),
                old_housing_id: old_housing_id.clone(),
                old_room_id: old_room_id.clone(),
                housing_id: housing.id.clone(),
                room_id: input.room_id,
                allocation_type: AllocationType::Reallocation,
                auditor_id: actor.id.clone(),
            })
            .await;

        let allocation = match allocation {
            Ok(allocation) => allocation,
            Err(err) => {
                // put the beneficiary back so the move does not go unaudited
                let mut restored = beneficiary.clone();
                restored.current_housing_id = old_housing_id;
                restored.current_room_id = old_room_id;

                if let Err(restore_err) =
                    self.beneficiary_repo.update(&beneficiary.id, restored).await
                {
                    log::error!(
                        target: "reliefline",
                        "msg=\"failed to restore beneficiary after allocation insert failure\", beneficiary_id={}, error=\"{restore_err}\"",
                        beneficiary.id
                    );
                }

                return Err(err);
            }
        };

        log::info!(
            target: "reliefline",
            "msg=\"beneficiary reallocated\", beneficiary_id={}, housing_id={}, auditor_id={}",
            beneficiary.id,
            housing.id,
            actor.id
        );

        Ok(allocation)
    }
}

/// Read path over a beneficiary's placement history, open to every
/// organization with a data-access grant.
pub struct ListAllocationsByBeneficiaryAction<A, B, O>
where
    A: BeneficiaryAllocationRepository,
    B: BeneficiaryRepository,
    O: OrganizationRepository,
{
    allocation_repo: A,
    beneficiary_repo: B,
    organization_repo: O,
}

impl<A, B, O> ListAllocationsByBeneficiaryAction<A, B, O>
where
    A: BeneficiaryAllocationRepository,
    B: BeneficiaryRepository,
    O: OrganizationRepository,
{
    pub fn new(allocation_repo: A, beneficiary_repo: B, organization_repo: O) -> Self {
        Self {
            allocation_repo,
            beneficiary_repo,
            organization_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "list_allocations_by_beneficiary", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        beneficiary_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<BeneficiaryAllocation>, Error> {
        let beneficiary = self
            .beneficiary_repo
            .find_by_id(beneficiary_id)
            .await?
            .ok_or(Error::BeneficiaryNotFound)?;

        let organization = self
            .organization_repo
            .find_by_id(&beneficiary.current_organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::has_access_to_organization_data(actor, &organization)?;

        self.allocation_repo
            .find_many_by_beneficiary_paginated(beneficiary_id, offset, limit)
            .await
    }
}
