use crate::entities::{ProductType, User};
use crate::repository::{NewProductType, OrganizationRepository, Page, ProductTypeRepository};
use crate::{guards, Error};

/// Action to add a product type to an organization's inventory catalog.
pub struct CreateProductTypeAction<P, O>
where
    P: ProductTypeRepository,
    O: OrganizationRepository,
{
    product_repo: P,
    organization_repo: O,
}

impl<P, O> CreateProductTypeAction<P, O>
where
    P: ProductTypeRepository,
    O: OrganizationRepository,
{
    pub fn new(product_repo: P, organization_repo: O) -> Self {
        Self {
            product_repo,
            organization_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "create_product_type", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        organization_id: &str,
        data: NewProductType,
    ) -> Result<ProductType, Error> {
        let organization = self
            .organization_repo
            .find_by_id(organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::is_organization_admin(actor, &organization)?;

        let product_type = self.product_repo.create(data, &organization.id).await?;

        log::info!(
            target: "reliefline",
            "msg=\"product type created\", product_type_id={}, organization_id={}",
            product_type.id,
            organization.id
        );

        Ok(product_type)
    }
}

/// Action to update a product type's descriptive fields. Stock totals move
/// through inventory movements, not through this action.
pub struct UpdateProductTypeAction<P, O>
where
    P: ProductTypeRepository,
    O: OrganizationRepository,
{
    product_repo: P,
    organization_repo: O,
}

impl<P, O> UpdateProductTypeAction<P, O>
where
    P: ProductTypeRepository,
    O: OrganizationRepository,
{
    pub fn new(product_repo: P, organization_repo: O) -> Self {
        Self {
            product_repo,
            organization_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "update_product_type", skip_all, err)
    )]
    pub async fn execute(&self, actor: &User, id: &str, data: NewProductType) -> Result<(), Error> {
        let product_type = self
            .product_repo
            .find_by_id(id)
            .await?
            .ok_or(Error::ProductTypeNotFound)?;

        let organization = self
            .organization_repo
            .find_by_id(&product_type.organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::is_organization_admin(actor, &organization)?;

        let updated = ProductType {
            name: data.name,
            description: data.description,
            category: data.category,
            ..product_type
        };

        self.product_repo.update(id, updated).await
    }
}

/// Action to retire a product type from the catalog.
pub struct DeleteProductTypeAction<P, O>
where
    P: ProductTypeRepository,
    O: OrganizationRepository,
{
    product_repo: P,
    organization_repo: O,
}

impl<P, O> DeleteProductTypeAction<P, O>
where
    P: ProductTypeRepository,
    O: OrganizationRepository,
{
    pub fn new(product_repo: P, organization_repo: O) -> Self {
        Self {
            product_repo,
            organization_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "delete_product_type", skip_all, err)
    )]
    pub async fn execute(&self, actor: &User, id: &str) -> Result<(), Error> {
        let product_type = self
            .product_repo
            .find_by_id(id)
            .await?
            .ok_or(Error::ProductTypeNotFound)?;

        let organization = self
            .organization_repo
            .find_by_id(&product_type.organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::is_organization_admin(actor, &organization)?;

        self.product_repo.delete(id).await
    }
}

/// Product catalog of an organization, readable under a data-access grant.
pub struct ListProductTypesByOrganizationAction<P, O>
where
    P: ProductTypeRepository,
    O: OrganizationRepository,
{
    product_repo: P,
    organization_repo: O,
}

impl<P, O> ListProductTypesByOrganizationAction<P, O>
where
    P: ProductTypeRepository,
    O: OrganizationRepository,
{
    pub fn new(product_repo: P, organization_repo: O) -> Self {
        Self {
            product_repo,
            organization_repo,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "list_product_types_by_organization", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &User,
        organization_id: &str,
        offset: u64,
        limit: u64,
    ) -> Result<Page<ProductType>, Error> {
        let organization = self
            .organization_repo
            .find_by_id(organization_id)
            .await?
            .ok_or(Error::OrganizationNotFound)?;

        guards::has_access_to_organization_data(actor, &organization)?;

        self.product_repo
            .find_many_by_organization_paginated(organization_id, offset, limit)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Organization;
    use crate::mocks::{MockOrganizationRepository, MockProductTypeRepository};

    fn new_product_type() -> NewProductType {
        NewProductType {
            name: "Blanket".to_owned(),
            description: "Wool, single".to_owned(),
            category: "BEDDING".to_owned(),
        }
    }

    struct Fixture {
        product_repo: MockProductTypeRepository,
        organization_repo: MockOrganizationRepository,
    }

    impl Fixture {
        fn new() -> Self {
            let fixture = Self {
                product_repo: MockProductTypeRepository::new(),
                organization_repo: MockOrganizationRepository::new(),
            };

            fixture
                .organization_repo
                .organizations
                .write()
                .unwrap()
                .insert("o1".to_owned(), Organization::mock("o1", "owner"));

            fixture
        }

        async fn create_product(&self) -> ProductType {
            let admin = User::mock_admin_of("u1", "o1");
            CreateProductTypeAction::new(
                self.product_repo.clone(),
                self.organization_repo.clone(),
            )
            .execute(&admin, "o1", new_product_type())
            .await
            .unwrap()
        }
    }

    #[tokio::test]
    async fn test_create_starts_with_empty_storage() {
        let fixture = Fixture::new();
        let product = fixture.create_product().await;

        assert_eq!(product.organization_id, "o1");
        assert_eq!(product.total_in_storage, 0);
    }

    #[tokio::test]
    async fn test_create_requires_admin() {
        let fixture = Fixture::new();
        let member = User::mock_member_of("u2", "o1");

        let result = CreateProductTypeAction::new(
            fixture.product_repo.clone(),
            fixture.organization_repo.clone(),
        )
        .execute(&member, "o1", new_product_type())
        .await;

        assert_eq!(result.unwrap_err(), Error::ForbiddenAction);
    }

    #[tokio::test]
    async fn test_update_keeps_storage_total() {
        let fixture = Fixture::new();
        let product = fixture.create_product().await;

        fixture
            .product_repo
            .product_types
            .write()
            .unwrap()
            .get_mut(&product.id)
            .unwrap()
            .total_in_storage = 120;

        let admin = User::mock_admin_of("u1", "o1");
        UpdateProductTypeAction::new(
            fixture.product_repo.clone(),
            fixture.organization_repo.clone(),
        )
        .execute(
            &admin,
            &product.id,
            NewProductType {
                name: "Blanket, winter".to_owned(),
                description: "Wool, double".to_owned(),
                category: "BEDDING".to_owned(),
            },
        )
        .await
        .unwrap();

        let updated = fixture
            .product_repo
            .product_types
            .read()
            .unwrap()
            .get(&product.id)
            .cloned()
            .unwrap();
        assert_eq!(updated.name, "Blanket, winter");
        assert_eq!(updated.total_in_storage, 120);
    }

    #[tokio::test]
    async fn test_delete_requires_owning_org_admin() {
        let fixture = Fixture::new();
        let product = fixture.create_product().await;

        let delete = DeleteProductTypeAction::new(
            fixture.product_repo.clone(),
            fixture.organization_repo.clone(),
        );

        let foreign_admin = User::mock_admin_of("u2", "o2");
        assert_eq!(
            delete.execute(&foreign_admin, &product.id).await.unwrap_err(),
            Error::ForbiddenAction
        );

        let superuser = User::mock_superuser("su");
        delete.execute(&superuser, &product.id).await.unwrap();
        assert!(fixture.product_repo.product_types.read().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_respects_access_grant() {
        let fixture = Fixture::new();
        fixture.create_product().await;

        let list = ListProductTypesByOrganizationAction::new(
            fixture.product_repo.clone(),
            fixture.organization_repo.clone(),
        );

        let member = User::mock_member_of("u2", "o1");
        assert_eq!(list.execute(&member, "o1", 0, 10).await.unwrap().total, 1);

        let outsider = User::mock_member_of("u3", "o2");
        assert_eq!(
            list.execute(&outsider, "o1", 0, 10).await.unwrap_err(),
            Error::ForbiddenAction
        );
    }
}
