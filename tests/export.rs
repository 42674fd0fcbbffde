use squad_matrix::demo_source::DemoMatrixSource;
use squad_matrix::matrix_export::export_matrix_xlsx;
use squad_matrix::matrix_fetch::{MatrixSource, Scope};
use squad_matrix::matrix_html::render_table_html;
use squad_matrix::scale::{BandedScale, ContinuousScale};
use squad_matrix::table::{NameStyle, build_table};

#[test]
fn writes_workbook_for_demo_team() {
    let matrix = DemoMatrixSource::new(42)
        .fetch(&Scope::Team(2))
        .expect("demo matrix");
    let table = build_table(&matrix, &BandedScale, NameStyle::FirstNameInitial);

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("matrix.xlsx");
    let report = export_matrix_xlsx(&path, "Player Matrix - Senior B", &table).expect("export");

    assert_eq!(report.players, 12);
    assert_eq!(report.cells, 144);
    let meta = std::fs::metadata(&path).expect("workbook written");
    assert!(meta.len() > 0);
}

#[test]
fn html_fragment_has_one_row_per_player() {
    let matrix = DemoMatrixSource::new(42)
        .fetch(&Scope::Team(1))
        .expect("demo matrix");
    let table = build_table(&matrix, &ContinuousScale, NameStyle::FirstName);
    let html = render_table_html(&table);

    let body = html.split("<tbody>").nth(1).expect("tbody");
    assert_eq!(body.matches("<tr>").count(), matrix.len());
    assert_eq!(html.matches("<td ").count(), matrix.len() * matrix.len());
}
