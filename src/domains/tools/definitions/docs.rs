//! Reference tools.
//!
//! Framework documentation, ABP CLI reference, best practices and server
//! status. All of them answer from built-in data and work without an API key.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::common::NoParams;
use crate::domains::tools::{Access, Mode, ToolContext, ToolDefinition, ToolOutput, ToolResult};

/// Documentation topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    GettingStarted,
    Architecture,
    Modules,
    Entities,
    ApplicationServices,
    Authorization,
    MultiTenancy,
    Localization,
    BackgroundJobs,
    AuditLogging,
    Ui,
}

impl Topic {
    const ALL: [Topic; 11] = [
        Topic::GettingStarted,
        Topic::Architecture,
        Topic::Modules,
        Topic::Entities,
        Topic::ApplicationServices,
        Topic::Authorization,
        Topic::MultiTenancy,
        Topic::Localization,
        Topic::BackgroundJobs,
        Topic::AuditLogging,
        Topic::Ui,
    ];

    fn title(self) -> &'static str {
        match self {
            Topic::GettingStarted => "Getting started",
            Topic::Architecture => "Layered architecture",
            Topic::Modules => "Modularity",
            Topic::Entities => "Entities and aggregate roots",
            Topic::ApplicationServices => "Application services and DTOs",
            Topic::Authorization => "Authorization and permissions",
            Topic::MultiTenancy => "Multi-tenancy",
            Topic::Localization => "Localization",
            Topic::BackgroundJobs => "Background jobs",
            Topic::AuditLogging => "Audit logging",
            Topic::Ui => "UI themes and frameworks",
        }
    }

    fn content(self) -> &'static str {
        match self {
            Topic::GettingStarted => {
                "Install the CLI with `dotnet tool install -g Volo.Abp.Cli`, then create a \
                 solution with `abp new Acme.BookStore`. Run the `DbMigrator` project once to \
                 create and seed the database, then start the host project. The default admin \
                 user is `admin` with password `1q2w3E*`."
            }
            Topic::Architecture => {
                "A layered solution has Domain.Shared (constants, enums, localization), Domain \
                 (entities, domain services, repository interfaces), Application.Contracts \
                 (DTOs, service interfaces, permission definitions), Application (service \
                 implementations), EntityFrameworkCore or MongoDB (repositories), HttpApi \
                 (controllers) and the host/UI projects. Dependencies point inward to Domain."
            }
            Topic::Modules => {
                "Every module has an `AbpModule` class declaring dependencies with \
                 `[DependsOn]`. Configure services in `ConfigureServices` and the pipeline in \
                 `OnApplicationInitialization`. Add prebuilt modules with \
                 `abp add-module Volo.Blogging`."
            }
            Topic::Entities => {
                "Derive entities from `Entity<TKey>` and aggregate roots from \
                 `AggregateRoot<TKey>` (or the audited variants such as \
                 `FullAuditedAggregateRoot<Guid>`). Keep invariants inside the aggregate, \
                 expose behaviour through methods and use a protected parameterless \
                 constructor for the ORM."
            }
            Topic::ApplicationServices => {
                "Application services implement use cases, derive from `ApplicationService` \
                 and take and return DTOs, never entities. `CrudAppService<TEntity, TDto, \
                 TKey, TGetListInput, TCreateInput>` gives list/get/create/update/delete. \
                 Auto API controllers expose them under `/api/app/{service}`."
            }
            Topic::Authorization => {
                "Define permissions in a `PermissionDefinitionProvider` in \
                 Application.Contracts and check them with `[Authorize(\"Group.Permission\")]` \
                 or `AuthorizationService.CheckAsync`. Grants are stored per provider: `R` for \
                 roles, `U` for users."
            }
            Topic::MultiTenancy => {
                "Implement `IMultiTenant` (a nullable `TenantId`) on entities that belong to a \
                 tenant; queries are filtered automatically by the current tenant. Use \
                 `CurrentTenant.Change(tenantId)` to switch scope. Tenants and editions are \
                 managed by the SaaS module."
            }
            Topic::Localization => {
                "Resources are JSON files under Domain.Shared, one per culture, registered \
                 with `options.Resources.Add<BookStoreResource>(\"en\")`. Inject \
                 `IStringLocalizer<BookStoreResource>` or use `L[\"Key\"]` in pages and \
                 services."
            }
            Topic::BackgroundJobs => {
                "Define a job as `AsyncBackgroundJob<TArgs>` and enqueue it with \
                 `IBackgroundJobManager.EnqueueAsync(args)`. Jobs are persisted and retried \
                 with an increasing delay until they are abandoned; Hangfire, Quartz and \
                 RabbitMQ integrations replace the default manager."
            }
            Topic::AuditLogging => {
                "Every HTTP request is written as an audit log with its actions and, for \
                 entities marked `[Audited]` or selected by `EntityHistorySelectors`, its \
                 entity changes. Configure with `AbpAuditingOptions`; use `[DisableAuditing]` \
                 to exclude a class or property."
            }
            Topic::Ui => {
                "ABP ships MVC/Razor Pages, Angular and Blazor UIs. Themes are LeptonX, \
                 LeptonX Lite, Basic and the legacy Lepton. Menus are contributed with \
                 `IMenuContributor`, bundles with `AbpBundlingOptions`."
            }
        }
    }

    fn to_json(self) -> Value {
        json!({
            "topic": self,
            "title": self.title(),
            "content": self.content(),
            "url": format!("https://abp.io/docs/latest/{}", self.slug()),
        })
    }

    fn slug(self) -> &'static str {
        match self {
            Topic::GettingStarted => "get-started",
            Topic::Architecture => "framework/architecture/domain-driven-design",
            Topic::Modules => "framework/architecture/modularity/basics",
            Topic::Entities => "framework/architecture/domain-driven-design/entities",
            Topic::ApplicationServices => {
                "framework/architecture/domain-driven-design/application-services"
            }
            Topic::Authorization => "framework/fundamentals/authorization",
            Topic::MultiTenancy => "framework/architecture/multi-tenancy",
            Topic::Localization => "framework/fundamentals/localization",
            Topic::BackgroundJobs => "framework/infrastructure/background-jobs",
            Topic::AuditLogging => "framework/infrastructure/audit-logging",
            Topic::Ui => "framework/ui",
        }
    }
}

/// Parameters for the documentation tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DocumentationParams {
    /// Topic to show. Lists all topics when omitted.
    pub topic: Option<Topic>,
}

/// Parameters for the CLI reference tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CliReferenceParams {
    /// Show only this command, e.g. "new" or "add-module".
    pub command: Option<String>,
}

/// Best practice area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum PracticeArea {
    Domain,
    Application,
    Data,
    Security,
    Testing,
}

/// Parameters for the best practices tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BestPracticesParams {
    /// Show only this area.
    pub area: Option<PracticeArea>,
}

const CLI_COMMANDS: &[(&str, &str, &str)] = &[
    ("new", "Create a new solution from a template.", "abp new Acme.BookStore -u angular -d mongodb"),
    ("add-module", "Add a prebuilt module to a solution.", "abp add-module Volo.Blogging"),
    ("add-package", "Add an ABP package to a project.", "abp add-package Volo.Abp.MongoDB"),
    ("update", "Update all ABP packages in the solution.", "abp update"),
    ("generate-proxy", "Generate client proxies for a UI.", "abp generate-proxy -t ng"),
    ("install-libs", "Install client-side libraries (wwwroot/libs).", "abp install-libs"),
    ("login", "Log in to abp.io with your account.", "abp login <username>"),
    ("suite", "Install, update or open ABP Suite.", "abp suite"),
    ("switch-to-preview", "Switch the solution to preview packages.", "abp switch-to-preview"),
    ("get-source", "Download the source code of a module.", "abp get-source Volo.Blogging"),
];

const BEST_PRACTICES: &[(PracticeArea, &str)] = &[
    (PracticeArea::Domain, "Reference other aggregates by id, never by navigation property."),
    (PracticeArea::Domain, "Validate invariants in entity constructors and methods, not in services."),
    (PracticeArea::Domain, "Use domain services only for logic spanning several aggregates."),
    (PracticeArea::Application, "Accept and return DTOs; never expose entities from application services."),
    (PracticeArea::Application, "Define one input DTO per use case rather than reusing output DTOs."),
    (PracticeArea::Application, "Check permissions with [Authorize] on every application service method."),
    (PracticeArea::Data, "Create a custom repository only when generic repositories are not enough."),
    (PracticeArea::Data, "Keep migrations in the EntityFrameworkCore project and run them with DbMigrator."),
    (PracticeArea::Data, "Use IUnitOfWork scopes instead of calling SaveChanges directly."),
    (PracticeArea::Security, "Never hard-code secrets; use user secrets or environment variables."),
    (PracticeArea::Security, "Grant the minimum permissions a role needs and audit changes."),
    (PracticeArea::Testing, "Write application tests against the real module with an in-memory database."),
    (PracticeArea::Testing, "Seed test data with IDataSeedContributor implementations."),
];

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "abp_get_documentation",
            "Get ABP Framework documentation for a topic, or the list of topics.",
            Access::Public,
            get_documentation,
        ),
        ToolDefinition::new(
            "abp_get_cli_reference",
            "Get ABP CLI commands with descriptions and examples.",
            Access::Public,
            get_cli_reference,
        ),
        ToolDefinition::new(
            "abp_get_best_practices",
            "Get ABP development best practices, optionally for one area.",
            Access::Public,
            get_best_practices,
        ),
        ToolDefinition::new(
            "abp_get_server_status",
            "Report the server mode, ABP base URL, whether an API key is configured and how \
             many tools are available.",
            Access::Public,
            get_server_status,
        ),
    ]
}

async fn get_documentation(p: DocumentationParams, _ctx: ToolContext) -> ToolResult {
    let data = match p.topic {
        Some(topic) => topic.to_json(),
        None => json!({
            "topics": Topic::ALL
                .iter()
                .map(|t| json!({ "topic": t, "title": t.title() }))
                .collect::<Vec<_>>()
        }),
    };
    Ok(ToolOutput::local(data))
}

async fn get_cli_reference(p: CliReferenceParams, _ctx: ToolContext) -> ToolResult {
    let wanted = p.command.as_deref().map(str::trim);
    let commands: Vec<Value> = CLI_COMMANDS
        .iter()
        .filter(|(name, _, _)| wanted.is_none_or(|w| w == *name))
        .map(|(name, description, example)| {
            json!({ "command": name, "description": description, "example": example })
        })
        .collect();

    let output = ToolOutput::local(json!({ "commands": commands }));
    Ok(match wanted {
        Some(w) if commands.is_empty() => {
            output.with_message(format!("No CLI command named '{}'", w))
        }
        _ => output,
    })
}

async fn get_best_practices(p: BestPracticesParams, _ctx: ToolContext) -> ToolResult {
    let practices: Vec<Value> = BEST_PRACTICES
        .iter()
        .filter(|(area, _)| p.area.is_none_or(|a| a == *area))
        .map(|(area, text)| json!({ "area": area, "practice": text }))
        .collect();
    Ok(ToolOutput::local(json!({ "practices": practices })))
}

async fn get_server_status(_: NoParams, ctx: ToolContext) -> ToolResult {
    let mode = ctx.mode();
    let counts = ctx.counts();
    let config = ctx.config();

    Ok(ToolOutput::local(json!({
        "server": config.server.name,
        "version": config.server.version,
        "mode": mode,
        "baseUrl": config.api.base_url,
        "credentialConfigured": config.api.api_key.is_some(),
        "remoteCallsEnabled": ctx.remote_enabled(),
        "availableTools": counts.visible,
        "totalTools": counts.total,
    }))
    .with_message(match mode {
        Mode::Full => "Full mode: all tools are available",
        Mode::InformationOnly => {
            "Information-only mode: set ABP_API_KEY to enable ABP management tools"
        }
    }))
}
