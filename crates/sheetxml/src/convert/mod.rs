//! Conversion between the tabular model and the tree document.
//!
//! Both directions agree on this shape:
//!
//! ```text
//! <Workbook>
//!   <WorkSheet name="...">
//!     <Row Height="300">
//!       <Cell><Data type="Number|Boolean|String">text</Data></Cell>
//!     </Row>
//!   </WorkSheet>
//! </Workbook>
//! ```
//!
//! Element and attribute names are case-sensitive.

mod forward;
mod reverse;

pub use forward::to_tree;
pub use reverse::to_workbook;

pub const WORKBOOK: &str = "Workbook";
pub const WORKSHEET: &str = "WorkSheet";
pub const ROW: &str = "Row";
pub const CELL: &str = "Cell";
pub const DATA: &str = "Data";

pub const ATTR_NAME: &str = "name";
pub const ATTR_HEIGHT: &str = "Height";
pub const ATTR_TYPE: &str = "type";
