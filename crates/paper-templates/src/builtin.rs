//! Built-in business templates
//!
//! Seed data for a fresh installation: the three document types most
//! installations start from. Field lists exercise every field kind the
//! forms engine supports.

use uuid::Uuid;

use paper_forms::{FieldDescriptor, FieldType};

use crate::catalog::TemplateCatalog;
use crate::template::{DocumentCategory, DocumentTemplate};

impl TemplateCatalog {
    /// Catalog pre-loaded with the built-in templates, all published.
    pub fn builtin() -> Self {
        let catalog = Self::new();
        for mut template in [nda(), offer_letter(), service_agreement()] {
            template.publish().expect("builtin template has fields");
            catalog
                .register(template)
                .expect("builtin template names are unique");
        }
        catalog
    }
}

fn field(field_name: &str, label: &str, field_type: FieldType, sort_order: i32) -> FieldDescriptor {
    FieldDescriptor {
        id: Uuid::new_v4().to_string(),
        field_name: field_name.to_string(),
        label: label.to_string(),
        field_type,
        is_required: false,
        sort_order,
        placeholder: None,
        help_text: None,
        options: None,
        min_length: None,
        max_length: None,
    }
}

fn required(field_name: &str, label: &str, field_type: FieldType, sort_order: i32) -> FieldDescriptor {
    let mut f = field(field_name, label, field_type, sort_order);
    f.is_required = true;
    f
}

fn nda() -> DocumentTemplate {
    let mut t = DocumentTemplate::create("Non-Disclosure Agreement", DocumentCategory::Legal);
    t.set_description("Mutual NDA between a disclosing and a receiving party");

    let mut disclosing = required("disclosingParty", "Disclosing Party", FieldType::Text, 10);
    disclosing.placeholder = Some("Acme Corporation".to_string());
    disclosing.min_length = Some(2);

    let mut term = field("termMonths", "Term (months)", FieldType::Number, 50);
    term.min_length = Some(1);
    term.max_length = Some(120);
    term.help_text = Some("Duration of the confidentiality obligation".to_string());

    let mut law = field("governingLaw", "Governing Law", FieldType::Select, 70);
    law.options = Some(r#"["California","Delaware","New York","Washington"]"#.to_string());

    let fields = [
        disclosing,
        required("receivingParty", "Receiving Party", FieldType::Text, 20),
        field("companyAddress", "Company Address", FieldType::Textarea, 30),
        required("effectiveDate", "Effective Date", FieldType::Date, 40),
        term,
        required(
            "confidentialityScope",
            "Scope of Confidential Information",
            FieldType::Textarea,
            60,
        ),
        law,
        required("disclosingSignature", "Authorized Signature", FieldType::Signature, 80),
    ];
    for f in fields {
        t.add_field(f).expect("nda field names are unique");
    }
    t
}

fn offer_letter() -> DocumentTemplate {
    let mut t = DocumentTemplate::create("Offer Letter", DocumentCategory::Hr);
    t.set_description("Employment offer with compensation and start date");

    let mut salary = required("baseSalary", "Base Salary (USD)", FieldType::Number, 50);
    salary.min_length = Some(1);

    let mut department = field("department", "Department", FieldType::Select, 60);
    department.options = Some(r#"["Engineering","Product","Sales","Operations"]"#.to_string());

    let fields = [
        required("candidateName", "Candidate Name", FieldType::Text, 10),
        required("candidateEmail", "Candidate Email", FieldType::Email, 20),
        required("position", "Position Title", FieldType::Text, 30),
        required("startDate", "Start Date", FieldType::Date, 40),
        salary,
        department,
        field("benefitsSummary", "Benefits Summary", FieldType::Textarea, 70),
        required("candidateSignature", "Candidate Signature", FieldType::Signature, 80),
    ];
    for f in fields {
        t.add_field(f).expect("offer letter field names are unique");
    }
    t
}

fn service_agreement() -> DocumentTemplate {
    let mut t = DocumentTemplate::create("Service Agreement", DocumentCategory::Sales);
    t.set_description("Recurring services engagement with payment terms");

    let mut fee = required("monthlyFee", "Monthly Fee (USD)", FieldType::Number, 70);
    fee.min_length = Some(1);

    let mut terms = field("paymentTerms", "Payment Terms", FieldType::Select, 80);
    terms.options = Some(r#"["Net 15","Net 30","Net 60"]"#.to_string());

    let fields = [
        required("clientCompany", "Client Company", FieldType::Text, 10),
        required("contactEmail", "Contact Email", FieldType::Email, 20),
        field("contactPhone", "Contact Phone", FieldType::Phone, 30),
        required(
            "servicesDescription",
            "Description of Services",
            FieldType::Textarea,
            40,
        ),
        required("startDate", "Start Date", FieldType::Date, 50),
        field("endDate", "End Date", FieldType::Date, 60),
        fee,
        terms,
        required("clientSignature", "Client Signature", FieldType::Signature, 90),
    ];
    for f in fields {
        t.add_field(f).expect("service agreement field names are unique");
    }
    t
}
