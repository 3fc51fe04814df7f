use std::{collections::HashSet, sync::Arc};

use tracing::{info, warn};
use validator::Validate;

use crate::{
    entities::{
        project::{NewProjectRequest, Project},
        seed::{SeedFailure, SeedReport, SeedStatus},
    },
    errors::{AppError, FieldError},
    query::{PageRequest, ProjectQuery},
    repositories::project::ProjectRepository,
};

const SAMPLE_SIZE: u32 = 3;

pub struct SeedHandler {
    pub project_repo: Arc<dyn ProjectRepository>,
    pub fixtures: Vec<NewProjectRequest>,
}

impl SeedHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepository>, fixtures: Vec<NewProjectRequest>) -> Self {
        SeedHandler {
            project_repo,
            fixtures,
        }
    }

    /// Replaces every project with the fixture set.
    ///
    /// The fixtures are validated up front; an invalid set leaves the store untouched.
    /// Inserts then run one at a time and individual failures are collected, not raised.
    pub async fn reseed(&self) -> Result<SeedReport, AppError> {
        let projects = self.validated_fixtures()?;

        let removed = self.project_repo.delete_all_projects().await?;
        info!("Seed removed {} existing projects", removed);

        let mut report = SeedReport {
            inserted_count: 0,
            failed_count: 0,
            failures: Vec::new(),
        };

        for project in &projects {
            match self.project_repo.create_project(project).await {
                Ok(_) => report.inserted_count += 1,
                Err(e) => {
                    warn!(slug = %project.slug, "Seed insert failed: {}", e);
                    report.failed_count += 1;
                    report.failures.push(SeedFailure {
                        slug: project.slug.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Seed finished: {} inserted, {} failed",
            report.inserted_count, report.failed_count
        );
        Ok(report)
    }

    /// Current project count with the newest few as a sample
    pub async fn status(&self) -> Result<SeedStatus, AppError> {
        let count = self.project_repo.count_projects().await?;

        let sample = self
            .project_repo
            .list_projects(&ProjectQuery {
                page: Some(PageRequest { page: 1, limit: SAMPLE_SIZE }),
                ..Default::default()
            })
            .await?
            .items
            .iter()
            .map(Project::summary)
            .collect();

        Ok(SeedStatus { count, sample })
    }

    fn validated_fixtures(&self) -> Result<Vec<Project>, AppError> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();
        let mut projects = Vec::with_capacity(self.fixtures.len());

        for (i, fixture) in self.fixtures.iter().enumerate() {
            let project = Project::from_request(fixture.clone());

            if let Err(e) = project.validate() {
                if let AppError::ValidationError(field_errors) = AppError::from(e) {
                    errors.extend(field_errors.into_iter().map(|fe| FieldError {
                        field: format!("fixtures[{}].{}", i, fe.field),
                        message: fe.message,
                    }));
                }
            }

            if !seen.insert(project.slug.clone()) {
                errors.push(FieldError {
                    field: format!("fixtures[{}].slug", i),
                    message: format!("duplicate slug '{}' in fixture list", project.slug),
                });
            }

            projects.push(project);
        }

        if errors.is_empty() {
            Ok(projects)
        } else {
            errors.sort_by(|a, b| a.field.cmp(&b.field));
            Err(AppError::ValidationError(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entities::{envelope::Paged, seed::SeedOutcome},
        repositories::project::MockProjectRepository,
    };

    fn fixture(slug: &str) -> NewProjectRequest {
        NewProjectRequest {
            title: format!("Project {}", slug),
            slug: slug.into(),
            description: "Seeded project".into(),
            ..Default::default()
        }
    }

    #[actix_rt::test]
    async fn invalid_fixtures_leave_store_untouched() {
        let mut repo = MockProjectRepository::new();
        repo.expect_delete_all_projects().never();
        repo.expect_create_project().never();

        let mut broken = fixture("broken");
        broken.title.clear();
        let handler = SeedHandler::new(
            Arc::new(repo),
            vec![fixture("alpha"), broken, fixture("alpha")],
        );

        match handler.reseed().await {
            Err(AppError::ValidationError(errors)) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["fixtures[1].title", "fixtures[2].slug"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn individual_insert_failures_are_collected() {
        let mut repo = MockProjectRepository::new();
        repo.expect_delete_all_projects().times(1).returning(|| Ok(4));
        repo.expect_create_project().returning(|project| {
            if project.slug == "beta" {
                Err(AppError::Upstream("connection reset".into()))
            } else {
                Ok(project.clone())
            }
        });

        let handler = SeedHandler::new(
            Arc::new(repo),
            vec![fixture("alpha"), fixture("beta"), fixture("gamma")],
        );
        let report = handler.reseed().await.unwrap();

        assert_eq!(report.inserted_count, 2);
        assert_eq!(report.failed_count, 1);
        assert_eq!(report.failures[0].slug, "beta");
        assert_eq!(report.outcome(), SeedOutcome::Partial);
    }

    #[actix_rt::test]
    async fn status_samples_newest_three() {
        let mut repo = MockProjectRepository::new();
        repo.expect_count_projects().returning(|| Ok(5));
        repo.expect_list_projects()
            .withf(|query| query.page == Some(PageRequest { page: 1, limit: 3 }))
            .returning(|_| {
                let items = ["e", "d", "c"]
                    .iter()
                    .map(|s| Project::from_request(fixture(&format!("{}{}{}", s, s, s))))
                    .collect();
                Ok(Paged { items, total: 5 })
            });

        let handler = SeedHandler::new(Arc::new(repo), Vec::new());
        let status = handler.status().await.unwrap();

        assert_eq!(status.count, 5);
        let slugs: Vec<_> = status.sample.iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(slugs, vec!["eee", "ddd", "ccc"]);
    }
}
