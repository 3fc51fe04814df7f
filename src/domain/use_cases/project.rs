use std::sync::Arc;

use crate::{
    entities::{
        envelope::Pagination,
        project::{NewProjectRequest, Project, ProjectPatch},
        schema::validate_document,
    },
    errors::AppError,
    query::{ProjectListParams, ProjectQuery},
    repositories::project::ProjectRepository,
};

pub struct ProjectHandler {
    pub project_repo: Arc<dyn ProjectRepository>,
}

impl ProjectHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepository>) -> Self {
        ProjectHandler { project_repo }
    }

    /// Lists projects newest first. Pagination is only reported when the caller asked for a page.
    pub async fn list_projects(
        &self,
        params: ProjectListParams,
    ) -> Result<(Vec<Project>, Option<Pagination>), AppError> {
        let query = ProjectQuery::try_from(params)?;
        let paged = self.project_repo.list_projects(&query).await?;

        let pagination = query
            .page
            .map(|page| Pagination::new(page.page, page.limit, paged.total));

        Ok((paged.items, pagination))
    }

    /// Retrieves a project by slug or id
    pub async fn get_project(&self, key: &str) -> Result<Project, AppError> {
        self.project_repo.get_project(key).await
    }

    pub async fn create_project(&self, request: NewProjectRequest) -> Result<Project, AppError> {
        let project = Project::from_request(request);
        validate_document(&project, Vec::new())?;

        self.project_repo.create_project(&project).await
    }

    /// Backs both `PUT` and `PATCH`: merges the present fields into the stored project
    /// and re-validates the result.
    pub async fn update_project(&self, key: &str, patch: ProjectPatch) -> Result<Project, AppError> {
        let mut project = self.project_repo.get_project(key).await?;

        project.apply_patch(patch);
        validate_document(&project, Vec::new())?;

        self.project_repo.replace_project(&project).await
    }

    pub async fn delete_project(&self, key: &str) -> Result<(), AppError> {
        self.project_repo.delete_project(key).await
    }

    /// Returns the new like count
    pub async fn like_project(&self, key: &str) -> Result<i64, AppError> {
        self.project_repo.increment_project_likes(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entities::{envelope::Paged, option_fields::OptionField},
        query::PageRequest,
        repositories::project::MockProjectRepository,
    };

    fn request(slug: &str) -> NewProjectRequest {
        NewProjectRequest {
            title: "Portfolio".into(),
            slug: slug.into(),
            description: "A portfolio site".into(),
            image: "https://example.com/cover.png".into(),
            ..Default::default()
        }
    }

    #[actix_rt::test]
    async fn invalid_document_never_reaches_the_store() {
        let mut repo = MockProjectRepository::new();
        repo.expect_create_project().never();

        let handler = ProjectHandler::new(Arc::new(repo));
        let mut bad = request("Not A Slug");
        bad.title.clear();

        match handler.create_project(bad).await {
            Err(AppError::ValidationError(errors)) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert!(fields.contains(&"slug"));
                assert!(fields.contains(&"title"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn pagination_only_reported_when_requested() {
        let mut repo = MockProjectRepository::new();
        repo.expect_list_projects()
            .withf(|query| query.page == Some(PageRequest { page: 2, limit: 1 }))
            .returning(|_| Ok(Paged { items: Vec::new(), total: 3 }));
        repo.expect_list_projects()
            .withf(|query| query.page.is_none())
            .returning(|_| Ok(Paged { items: Vec::new(), total: 3 }));

        let handler = ProjectHandler::new(Arc::new(repo));

        let (_, pagination) = handler
            .list_projects(ProjectListParams {
                page: Some("2".into()),
                limit: Some("1".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(pagination, Some(Pagination::new(2, 1, 3)));

        let (_, pagination) = handler.list_projects(ProjectListParams::default()).await.unwrap();
        assert!(pagination.is_none());
    }

    #[actix_rt::test]
    async fn patch_revalidates_merged_document() {
        let stored = Project::from_request(request("portfolio"));

        let mut repo = MockProjectRepository::new();
        repo.expect_get_project()
            .returning(move |_| Ok(stored.clone()));
        repo.expect_replace_project().never();

        let handler = ProjectHandler::new(Arc::new(repo));
        let patch = ProjectPatch {
            slug: OptionField::SetToValue("Bad Slug!".into()),
            ..Default::default()
        };

        let err = handler.update_project("portfolio", patch).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[actix_rt::test]
    async fn update_of_missing_project_is_not_found() {
        let mut repo = MockProjectRepository::new();
        repo.expect_get_project()
            .returning(|_| Err(AppError::NotFound("Project not found".into())));

        let handler = ProjectHandler::new(Arc::new(repo));
        let patch = ProjectPatch {
            title: OptionField::SetToValue("X".into()),
            ..Default::default()
        };
        let err = handler.update_project("ghost", patch).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
