use crate::geo::{ExportTarget, LayerPlan, export_targets, is_visible, layer_bit, mask_histogram};

#[test]
fn presence_strings_follow_object_order() {
	let plan = LayerPlan::build(&[0x01, 0xFF, 0x02], 0x03);
	assert_eq!(plan.layers[0].presence, "110");
	assert_eq!(plan.layers[1].presence, "011");
	assert_eq!(plan.layers[2].presence, "010");
	assert_eq!(plan.layers[0].object_count(), 2);
}

#[test]
fn identical_presence_marks_later_layer_duplicate() {
	let plan = LayerPlan::build(&[0x03, 0xFF], 0x03);
	assert_eq!(plan.layers[0].duplicate_of, None);
	assert_eq!(plan.layers[1].duplicate_of, Some(0));
	// Layers 2..8 only see the 0xFF object, and share layer 2's presence.
	assert_eq!(plan.layers[2].duplicate_of, None);
	assert_eq!(plan.layers[7].duplicate_of, Some(2));

	let exported: Vec<u8> = plan.exported(false).map(|layer| layer.index).collect();
	assert_eq!(exported, vec![0]);
	assert_eq!(plan.undiscovered(), vec![2]);
	assert!(plan.duplicates().contains(&(1, 0)));
}

#[test]
fn all_global_masks_export_one_unlayered_file() {
	let plan = LayerPlan::build(&[0xFF, 0xFF, 0xFF], 0);
	assert!(!plan.is_layered());
	assert_eq!(export_targets(&plan, false, false), vec![ExportTarget::Unlayered]);
	assert_eq!(export_targets(&plan, true, false), vec![ExportTarget::Merged]);
}

#[test]
fn undiscovered_layers_are_opt_in() {
	let plan = LayerPlan::build(&[0x01, 0xFF], 0x01);
	assert_eq!(export_targets(&plan, false, false), vec![ExportTarget::Layer(0)]);
	assert_eq!(export_targets(&plan, false, true), vec![ExportTarget::Layer(0), ExportTarget::Layer(1)]);
}

#[test]
fn target_stems_and_filters() {
	assert_eq!(ExportTarget::Unlayered.file_stem("Map1"), "Map1");
	assert_eq!(ExportTarget::Layer(3).file_stem("Map1"), "Map1.Layer3");
	assert_eq!(ExportTarget::Layer(3).filter(), 0b0000_1000);
	assert_eq!(ExportTarget::Merged.filter(), 0);
	assert_eq!(layer_bit(7), 0x80);
	assert!(is_visible(0xFF, layer_bit(5)));
	assert!(!is_visible(0x01, layer_bit(5)));
}

#[test]
fn histogram_counts_each_mask() {
	let histogram = mask_histogram(&[0xFF, 0x01, 0xFF]);
	assert_eq!(histogram.get(&0xFF), Some(&2));
	assert_eq!(histogram.get(&0x01), Some(&1));
	assert_eq!(histogram.len(), 2);
}
