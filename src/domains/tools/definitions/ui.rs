//! UI tools.
//!
//! Theme listing and page/form scaffolding. These are hybrid tools: they ask
//! the ABP API when an API key is configured and otherwise (or when the call
//! fails) answer from the built-in templates below.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::common::NoParams;
use super::entities::is_pascal_identifier;
use crate::core::api::ApiRequest;
use crate::domains::tools::{Access, ToolContext, ToolDefinition, ToolError, ToolResult, run_hybrid};

/// UI stack to generate code for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum UiStack {
    Mvc,
    Angular,
    Blazor,
}

fn default_ui_stack() -> UiStack {
    UiStack::Mvc
}

/// Kind of page to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    /// Data table with create/edit/delete actions.
    List,
    /// Read-only detail view of one record.
    Detail,
    /// Dashboard with summary widgets.
    Dashboard,
}

fn default_page_kind() -> PageKind {
    PageKind::List
}

/// Parameters for generating a page.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePageParams {
    /// Entity the page is for, in PascalCase, e.g. "Book".
    pub entity_name: String,

    /// UI stack (default: mvc).
    #[serde(default = "default_ui_stack")]
    pub ui_framework: UiStack,

    /// Page kind (default: list).
    #[serde(default = "default_page_kind")]
    pub page_type: PageKind,

    /// Theme to target, e.g. "LeptonX".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

/// One form field.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    /// Property name in PascalCase, e.g. "Title".
    pub name: String,

    /// Input type (default: text).
    #[serde(default = "default_field_type", rename = "type")]
    pub field_type: FieldType,

    /// Whether the field is required.
    #[serde(default)]
    pub required: bool,
}

/// Form input type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Checkbox,
    Email,
    Textarea,
}

fn default_field_type() -> FieldType {
    FieldType::Text
}

/// Parameters for generating a form.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateFormParams {
    /// Entity the form edits, in PascalCase, e.g. "Book".
    pub entity_name: String,

    /// Form fields, in display order.
    pub fields: Vec<FormField>,

    /// UI stack (default: mvc).
    #[serde(default = "default_ui_stack")]
    pub ui_framework: UiStack,
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "abp_get_themes",
            "List available ABP UI themes and their styles. Works without an API key.",
            Access::Hybrid,
            get_themes,
        ),
        ToolDefinition::new(
            "abp_generate_page",
            "Generate a list, detail or dashboard page for an entity (MVC, Angular or Blazor). \
             Works without an API key.",
            Access::Hybrid,
            generate_page,
        ),
        ToolDefinition::new(
            "abp_generate_form",
            "Generate a create/edit form for an entity from a field list. Works without an API key.",
            Access::Hybrid,
            generate_form,
        ),
    ]
}

async fn get_themes(_: NoParams, ctx: ToolContext) -> ToolResult {
    run_hybrid(&ctx, ApiRequest::get("/api/ui/themes"), builtin_themes).await
}

async fn generate_page(p: GeneratePageParams, ctx: ToolContext) -> ToolResult {
    check_entity_name(&p.entity_name)?;
    let request = ApiRequest::post("/api/ui/pages/generate").json(&p);
    run_hybrid(&ctx, request, || page_template(&p)).await
}

async fn generate_form(p: GenerateFormParams, ctx: ToolContext) -> ToolResult {
    check_entity_name(&p.entity_name)?;
    if p.fields.is_empty() {
        return Err(ToolError::invalid_arguments("fields must not be empty"));
    }
    if let Some(field) = p.fields.iter().find(|f| !is_pascal_identifier(&f.name)) {
        return Err(ToolError::invalid_arguments(format!(
            "field name '{}' must be a PascalCase identifier",
            field.name
        )));
    }
    let request = ApiRequest::post("/api/ui/forms/generate").json(&p);
    run_hybrid(&ctx, request, || form_template(&p)).await
}

fn check_entity_name(name: &str) -> Result<(), ToolError> {
    if is_pascal_identifier(name) {
        Ok(())
    } else {
        Err(ToolError::invalid_arguments(format!(
            "entityName '{}' must be a PascalCase identifier",
            name
        )))
    }
}

// ============================================================================
// Built-in templates
// ============================================================================

fn builtin_themes() -> Value {
    json!({
        "availableThemes": [
            {
                "name": "LeptonX",
                "description": "Modern theme with light, dark, dim and system styles; commercial.",
                "styles": ["light", "dark", "dim", "system"],
                "uiFrameworks": ["mvc", "angular", "blazor"]
            },
            {
                "name": "LeptonXLite",
                "description": "Free edition of LeptonX with a single light style.",
                "styles": ["light"],
                "uiFrameworks": ["mvc", "angular", "blazor"]
            },
            {
                "name": "Basic",
                "description": "Minimal Bootstrap theme, intended as a base for custom themes.",
                "styles": ["default"],
                "uiFrameworks": ["mvc", "angular", "blazor"]
            },
            {
                "name": "Lepton",
                "description": "Legacy commercial theme with six colour styles.",
                "styles": ["style1", "style2", "style3", "style4", "style5", "style6"],
                "uiFrameworks": ["mvc", "angular", "blazor"]
            }
        ],
        "defaultTheme": "LeptonXLite"
    })
}

/// `BookStore` -> `book-store`
fn kebab(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `Book` -> `Books`, `Category` -> `Categories`
fn plural(name: &str) -> String {
    if let Some(stem) = name.strip_suffix('y')
        && !stem.ends_with(['a', 'e', 'i', 'o', 'u'])
    {
        return format!("{}ies", stem);
    }
    if name.ends_with('s') || name.ends_with('x') || name.ends_with("ch") || name.ends_with("sh") {
        return format!("{}es", name);
    }
    format!("{}s", name)
}

fn page_template(p: &GeneratePageParams) -> Value {
    let entity = p.entity_name.as_str();
    let entities = plural(entity);
    let slug = kebab(&entities);

    let files = match (p.ui_framework, p.page_type) {
        (UiStack::Mvc, PageKind::List) => vec![
            (
                format!("Pages/{}/Index.cshtml", entities),
                format!(
                    "@page\n@using Microsoft.AspNetCore.Mvc.Localization\n@model {entities}.IndexModel\n\
                     <abp-card>\n    <abp-card-header>\n        <h2>@L[\"{entities}\"]</h2>\n\
                     <abp-button id=\"New{entity}Button\" text=\"@L[\"New{entity}\"].Value\" icon=\"plus\" button-type=\"Primary\" />\n\
                     </abp-card-header>\n    <abp-card-body>\n        <abp-table striped-rows=\"true\" id=\"{entities}Table\"></abp-table>\n\
                     </abp-card-body>\n</abp-card>\n"
                ),
            ),
            (
                format!("Pages/{}/Index.cshtml.cs", entities),
                format!(
                    "namespace {entities};\n\npublic class IndexModel : AbpPageModel\n{{\n    public void OnGet()\n    {{\n    }}\n}}\n"
                ),
            ),
            (
                format!("Pages/{}/Index.js", entities),
                format!(
                    "$(function () {{\n    var service = window.app.{lower}s;\n    var dataTable = $('#{entities}Table').DataTable(\n        abp.libs.datatables.normalizeConfiguration({{\n            serverSide: true,\n            paging: true,\n            ajax: abp.libs.datatables.createAjax(service.getList),\n            columnDefs: []\n        }})\n    );\n}});\n",
                    lower = entity.to_lowercase()
                ),
            ),
        ],
        (UiStack::Mvc, kind) => vec![(
            format!("Pages/{}/{}.cshtml", entities, page_file(kind)),
            format!(
                "@page\n@model {entities}.{name}Model\n<abp-card>\n    <abp-card-header><h2>@L[\"{entity}\"]</h2></abp-card-header>\n    <abp-card-body></abp-card-body>\n</abp-card>\n",
                name = page_file(kind)
            ),
        )],
        (UiStack::Angular, kind) => vec![
            (
                format!("src/app/{}/{}-{}.component.ts", slug, slug, page_file(kind).to_lowercase()),
                format!(
                    "import {{ Component, OnInit }} from '@angular/core';\nimport {{ ListService, PagedResultDto }} from '@abp/ng.core';\n\n\
                     @Component({{\n  selector: 'app-{slug}',\n  templateUrl: './{slug}-{file}.component.html',\n  providers: [ListService],\n}})\n\
                     export class {entity}{name}Component implements OnInit {{\n  items = {{ items: [], totalCount: 0 }} as PagedResultDto<any>;\n\n  constructor(public readonly list: ListService) {{}}\n\n  ngOnInit(): void {{}}\n}}\n",
                    file = page_file(kind).to_lowercase(),
                    name = page_file(kind)
                ),
            ),
            (
                format!("src/app/{}/{}-{}.component.html", slug, slug, page_file(kind).to_lowercase()),
                format!(
                    "<div class=\"card\">\n  <div class=\"card-header\"><h5 class=\"card-title\">{{{{ '::Menu:{entities}' | abpLocalization }}}}</h5></div>\n  <div class=\"card-body\"></div>\n</div>\n"
                ),
            ),
        ],
        (UiStack::Blazor, kind) => vec![(
            format!("Pages/{}{}.razor", entities, if kind == PageKind::List { "" } else { page_file(kind) }),
            format!(
                "@page \"/{slug}\"\n@inherits AbpComponentBase\n<Card>\n    <CardHeader><h2>@L[\"{entities}\"]</h2></CardHeader>\n    <CardBody>\n{body}    </CardBody>\n</Card>\n",
                body = if kind == PageKind::List {
                    format!("        <DataGrid TItem=\"{entity}Dto\" Data=\"Items\" ReadData=\"OnDataGridReadAsync\" TotalItems=\"TotalCount\" ShowPager=\"true\" />\n")
                } else {
                    String::new()
                }
            ),
        )],
    };

    json!({
        "entityName": entity,
        "uiFramework": p.ui_framework,
        "pageType": p.page_type,
        "theme": p.theme.as_deref().unwrap_or("LeptonXLite"),
        "route": format!("/{}", slug),
        "files": files
            .into_iter()
            .map(|(path, content)| json!({ "path": path, "content": content }))
            .collect::<Vec<_>>()
    })
}

fn page_file(kind: PageKind) -> &'static str {
    match kind {
        PageKind::List => "Index",
        PageKind::Detail => "Detail",
        PageKind::Dashboard => "Dashboard",
    }
}

fn form_template(p: &GenerateFormParams) -> Value {
    let entity = p.entity_name.as_str();

    let (path, content) = match p.ui_framework {
        UiStack::Mvc => {
            let inputs: String = p
                .fields
                .iter()
                .map(|f| match f.field_type {
                    FieldType::Textarea => {
                        format!("        <abp-input asp-for=\"{entity}.{}\" textarea=\"true\" />\n", f.name)
                    }
                    _ => format!("        <abp-input asp-for=\"{entity}.{}\" />\n", f.name),
                })
                .collect();
            (
                format!("Pages/{}/CreateModal.cshtml", plural(entity)),
                format!(
                    "@page\n@model CreateModalModel\n<abp-dynamic-form abp-model=\"{entity}\" asp-page=\"/{}/CreateModal\">\n    <abp-modal>\n        <abp-modal-header title=\"@L[\"New{entity}\"].Value\"></abp-modal-header>\n    <abp-modal-body>\n{inputs}    </abp-modal-body>\n        <abp-modal-footer buttons=\"@(AbpModalButtons.Cancel|AbpModalButtons.Save)\"></abp-modal-footer>\n    </abp-modal>\n</abp-dynamic-form>\n",
                    plural(entity)
                ),
            )
        }
        UiStack::Angular => {
            let controls: String = p
                .fields
                .iter()
                .map(|f| {
                    let validators = if f.required { "Validators.required" } else { "" };
                    format!("      {}: [null, [{}]],\n", camel(&f.name), validators)
                })
                .collect();
            let slug = kebab(entity);
            (
                format!("src/app/{}/{}-form.component.ts", kebab(&plural(entity)), slug),
                format!(
                    "import {{ Component }} from '@angular/core';\nimport {{ FormBuilder, FormGroup, Validators }} from '@angular/forms';\n\n\
                     @Component({{ selector: 'app-{slug}-form', templateUrl: './{slug}-form.component.html' }})\n\
                     export class {entity}FormComponent {{\n  form: FormGroup;\n\n  constructor(private fb: FormBuilder) {{\n    this.form = this.fb.group({{\n{controls}    }});\n  }}\n}}\n"
                ),
            )
        }
        UiStack::Blazor => {
            let inputs: String = p
                .fields
                .iter()
                .map(|f| {
                    let component = match f.field_type {
                        FieldType::Number => "NumericEdit TValue=\"decimal\"",
                        FieldType::Date => "DateEdit TValue=\"DateTime\"",
                        FieldType::Checkbox => "Check TValue=\"bool\"",
                        FieldType::Textarea => "MemoEdit",
                        FieldType::Text | FieldType::Email => "TextEdit",
                    };
                    let binding = match f.field_type {
                        FieldType::Checkbox => "Checked",
                        FieldType::Number | FieldType::Date => "Value",
                        _ => "Text",
                    };
                    format!(
                        "    <Field>\n        <FieldLabel>@L[\"{name}\"]</FieldLabel>\n        <{component} @bind-{binding}=\"New{entity}.{name}\" />\n    </Field>\n",
                        name = f.name
                    )
                })
                .collect();
            (
                format!("Pages/{}Form.razor", entity),
                format!("<Validations @ref=\"CreateValidationsRef\" Model=\"@New{entity}\" ValidateOnLoad=\"false\">\n{inputs}</Validations>\n"),
            )
        }
    };

    json!({
        "entityName": entity,
        "uiFramework": p.ui_framework,
        "fields": p.fields,
        "files": [{ "path": path, "content": content }]
    })
}

/// `IsActive` -> `isActive`
fn camel(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
